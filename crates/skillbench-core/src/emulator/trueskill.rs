//! Gaussian skill-belief tracker.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::gaussian::{Belief, GaussianBackend, RatingBackend, win_probability};
use super::{Emulator, EmulatorError, EmulatorKind, FitCounters, MatchOutcome};
use crate::data::{Team, TeamPair};

const DEFAULT_MU: f64 = 25.0;
const DEFAULT_SIGMA: f64 = DEFAULT_MU / 3.0;
const DEFAULT_BETA: f64 = DEFAULT_SIGMA / 2.0;
const DEFAULT_TAU: f64 = DEFAULT_SIGMA / 100.0;
const DEFAULT_DRAW_PROBABILITY: f64 = 0.10;
const DEFAULT_MIN_SIGMA: f64 = 1e-4;

/// Hyper parameters fixed for the lifetime of an emulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrueSkillConfig {
    /// Prior mean for a team seen for the first time.
    pub mu: f64,
    /// Prior standard deviation for a team seen for the first time.
    pub sigma: f64,
    /// Performance noise: how much of a single result is luck rather than skill.
    pub beta: f64,
    /// Drift added (as variance) before every update.
    pub tau: f64,
    /// Probability that two equally rated teams draw. Must be in (0, 1).
    pub draw_probability: f64,
    /// Uncertainty never shrinks below this value.
    pub min_sigma: f64,
}

impl Default for TrueSkillConfig {
    fn default() -> Self {
        Self {
            mu: DEFAULT_MU,
            sigma: DEFAULT_SIGMA,
            beta: DEFAULT_BETA,
            tau: DEFAULT_TAU,
            draw_probability: DEFAULT_DRAW_PROBABILITY,
            min_sigma: DEFAULT_MIN_SIGMA,
        }
    }
}

impl TrueSkillConfig {
    /// Returns the name of the first field that is out of range.
    pub fn invalid_field(&self) -> Option<&'static str> {
        if !self.mu.is_finite() {
            Some("mu")
        } else if !(self.sigma.is_finite() && self.sigma > 0.0) {
            Some("sigma")
        } else if !(self.beta.is_finite() && self.beta > 0.0) {
            Some("beta")
        } else if !(self.tau.is_finite() && self.tau >= 0.0) {
            Some("tau")
        } else if !(self.draw_probability > 0.0 && self.draw_probability < 1.0) {
            Some("draw_probability")
        } else if !(self.min_sigma.is_finite() && self.min_sigma > 0.0) {
            Some("min_sigma")
        } else {
            None
        }
    }

    pub fn prior(&self) -> Belief {
        Belief::new(self.mu, self.sigma)
    }

    pub fn backend(&self) -> GaussianBackend {
        GaussianBackend {
            beta: self.beta,
            tau: self.tau,
            draw_probability: self.draw_probability,
            min_sigma: self.min_sigma,
        }
    }
}

/// One row of a rating snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSnapshot {
    pub team: Team,
    pub mu: f64,
    pub sigma: f64,
}

/// Consumer of rating snapshots (plots, tables). Never sees the emulator itself.
pub trait RatingSink {
    fn render(&mut self, prior: &Belief, ratings: &[RatingSnapshot]);
}

/// Tracks a Gaussian belief per team and predicts with a Thurstone-Mosteller model.
#[derive(Debug, Clone)]
pub struct TrueSkillEmulator<B = GaussianBackend> {
    config: TrueSkillConfig,
    backend: B,
    ratings: HashMap<Team, Belief>,
    counters: FitCounters,
}

impl TrueSkillEmulator<GaussianBackend> {
    pub fn new(config: TrueSkillConfig) -> Result<Self, EmulatorError> {
        Self::with_backend(config, config.backend())
    }
}

impl Default for TrueSkillEmulator<GaussianBackend> {
    fn default() -> Self {
        let config = TrueSkillConfig::default();
        Self {
            backend: config.backend(),
            config,
            ratings: HashMap::new(),
            counters: FitCounters::new(),
        }
    }
}

impl<B: RatingBackend> TrueSkillEmulator<B> {
    pub fn with_backend(config: TrueSkillConfig, backend: B) -> Result<Self, EmulatorError> {
        if let Some(field) = config.invalid_field() {
            return Err(EmulatorError::InvalidConfig {
                field,
                value: config_value(&config, field),
            });
        }
        Ok(Self {
            config,
            backend,
            ratings: HashMap::new(),
            counters: FitCounters::new(),
        })
    }

    pub fn config(&self) -> &TrueSkillConfig {
        &self.config
    }

    /// Current belief for `team`, the prior if it has never been fit.
    pub fn rating(&self, team: &Team) -> Belief {
        self.ratings
            .get(team)
            .copied()
            .unwrap_or_else(|| self.config.prior())
    }

    pub fn ratings(&self) -> &HashMap<Team, Belief> {
        &self.ratings
    }

    /// Fitted ratings sorted by case-insensitive team name.
    pub fn snapshot(&self) -> Vec<RatingSnapshot> {
        let mut rows: Vec<RatingSnapshot> = self
            .ratings
            .iter()
            .map(|(team, belief)| RatingSnapshot {
                team: team.clone(),
                mu: belief.mu,
                sigma: belief.sigma,
            })
            .collect();
        rows.sort_by(|a, b| {
            a.team
                .name()
                .to_lowercase()
                .cmp(&b.team.name().to_lowercase())
                .then_with(|| a.team.cmp(&b.team))
        });
        rows
    }

    pub fn visualize(&self, sink: &mut dyn RatingSink) {
        sink.render(&self.config.prior(), &self.snapshot());
    }
}

fn config_value(config: &TrueSkillConfig, field: &str) -> f64 {
    match field {
        "mu" => config.mu,
        "sigma" => config.sigma,
        "beta" => config.beta,
        "tau" => config.tau,
        "draw_probability" => config.draw_probability,
        _ => config.min_sigma,
    }
}

impl<B: RatingBackend> Emulator for TrueSkillEmulator<B> {
    fn kind(&self) -> EmulatorKind {
        EmulatorKind::TrueSkill
    }

    fn emulate(&self, team1: &Team, team2: &Team) -> f64 {
        win_probability(
            &[self.rating(team1)],
            &[self.rating(team2)],
            self.config.beta,
        )
    }

    fn fit_one_match(
        &mut self,
        teams: &TeamPair,
        winner: Option<&Team>,
    ) -> Result<(), EmulatorError> {
        let (first, second) = teams.teams();
        let outcome = MatchOutcome::resolve(teams, winner);
        let prior1 = self.rating(first);
        let prior2 = self.rating(second);

        let (post1, post2) = self
            .backend
            .rate(&prior1, &prior2, outcome)
            .map_err(|err| {
                warn!(
                    target: "skillbench_core::emulator",
                    pair = %teams,
                    ?outcome,
                    error = %err,
                    "belief update rejected"
                );
                EmulatorError::NumericalInstability {
                    pair: teams.to_string(),
                    detail: err.0,
                }
            })?;

        self.counters.record(teams);
        self.ratings.insert(first.clone(), post1);
        self.ratings.insert(second.clone(), post2);

        debug!(
            target: "skillbench_core::emulator",
            pair = %teams,
            ?outcome,
            mu_first = post1.mu,
            sigma_first = post1.sigma,
            mu_second = post2.mu,
            sigma_second = post2.sigma,
            "fit match"
        );
        Ok(())
    }

    fn name(&self) -> String {
        let config = &self.config;
        format!(
            "TrueSkill(mu={}, sigma={}, beta={}, tau={}, draw_probability={}, min_sigma={})",
            config.mu,
            config.sigma,
            config.beta,
            config.tau,
            config.draw_probability,
            config.min_sigma
        )
    }

    fn counters(&self) -> &FitCounters {
        &self.counters
    }

    fn belief(&self, team: &Team) -> Option<Belief> {
        Some(self.rating(team))
    }
}
