mod blueprint;

use std::path::PathBuf;

use skillbench_core::emulator::MatchOutcome;
use skillbench_core::{
    AcquisitionError, AcquisitionFunction, Emulator, EmulatorError, EmulatorKind, LeagueError,
    OutcomeSource, PairError, SimulatedLeague, Team, all_pairs, best_pair,
};
use thiserror::Error;
use tracing::{Level, event, info, warn};

use crate::analytics::{RunAnalytics, RunReport};
use crate::config::{BenchmarkConfig, ResolvedOutputs};

pub use blueprint::BlueprintError;
use blueprint::EmulatorBlueprint;

/// Primary entry point for orchestrating active-learning runs.
pub struct ActiveLearningRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    emulators: Vec<EmulatorBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub rounds: usize,
    pub reports: Vec<RunReport>,
    pub skipped: Vec<SkippedRun>,
    pub telemetry_path: Option<PathBuf>,
}

/// An (emulator, acquirer) combination rejected by the compatibility gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRun {
    pub emulator: String,
    pub acquirer: String,
    pub kind: EmulatorKind,
}

impl ActiveLearningRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let emulators = EmulatorBlueprint::from_configs(&config.emulators)?;
        let runner = Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            emulators,
        };
        runner.league()?;
        Ok(runner)
    }

    /// Execute every configured combination from a fresh emulator and league.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut reports = Vec::new();
        let mut skipped = Vec::new();

        for blueprint in &self.emulators {
            for kind in &self.config.acquirers {
                let acquirer = kind.build();
                let emulator = blueprint.spawn();

                if !acquirer.is_compatible(emulator.as_ref()) {
                    warn!(
                        target: "skillbench_bench::runner",
                        run_id = %self.config.run_id,
                        emulator = %blueprint.label,
                        acquirer = %acquirer.name(),
                        kind = ?blueprint.kind(),
                        "skipping incompatible combination"
                    );
                    skipped.push(SkippedRun {
                        emulator: blueprint.label.clone(),
                        acquirer: acquirer.name(),
                        kind: blueprint.kind(),
                    });
                    continue;
                }

                let report = self.run_combination(&blueprint.label, acquirer.as_ref(), emulator)?;
                info!(
                    target: "skillbench_bench::runner",
                    run_id = %self.config.run_id,
                    emulator = %report.emulator,
                    acquirer = %report.acquirer,
                    steps = report.steps as u64,
                    mean_brier = report.mean_brier,
                    ordering_accuracy = report.ordering_accuracy,
                    "combination finished"
                );
                reports.push(report);
            }
        }

        Ok(RunSummary {
            rounds: self.config.rounds,
            reports,
            skipped,
            telemetry_path: self
                .logging_enabled
                .then(|| self.outputs.telemetry_path()),
        })
    }

    fn run_combination(
        &self,
        label: &str,
        acquirer: &dyn AcquisitionFunction,
        mut emulator: Box<dyn Emulator>,
    ) -> Result<RunReport, RunnerError> {
        let mut league = self.league()?;
        let candidates = all_pairs(league.teams());
        let mut analytics = RunAnalytics::new(label, acquirer.name());

        for step in 0..self.config.rounds {
            let Some((chosen, score)) = best_pair(acquirer, emulator.as_ref(), &candidates)? else {
                break;
            };
            let (a, b) = chosen.teams();
            let pair = league.pair(a.clone(), b.clone())?;

            let predicted = emulator.emulate(pair.first(), pair.second());
            let winner = league.play(&pair);
            analytics.record_step(predicted, MatchOutcome::resolve(&pair, winner.as_ref()));
            emulator.fit_one_match(&pair, winner.as_ref())?;

            if self.logging_enabled
                && self.config.logging.step_details
                && tracing::enabled!(Level::INFO)
            {
                event!(
                    target: "skillbench_bench::step",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    emulator = %label,
                    acquirer = %acquirer.name(),
                    step = step as u64,
                    first = %pair.first(),
                    second = %pair.second(),
                    score,
                    predicted,
                    winner = winner.as_ref().map(Team::name).unwrap_or("draw"),
                );
            }
        }

        Ok(analytics.finalize(emulator.as_ref(), &league))
    }

    fn league(&self) -> Result<SimulatedLeague, RunnerError> {
        let league = &self.config.league;
        let skills = league
            .teams
            .iter()
            .map(|team| (Team::new(&team.name), team.skill));
        Ok(SimulatedLeague::new(
            skills,
            league.beta,
            league.draw_rate,
            league.seed.unwrap_or(0),
        )?)
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Blueprint(#[from] BlueprintError),
    #[error("league setup failed: {0}")]
    League(#[from] LeagueError),
    #[error("matchup construction failed: {0}")]
    Pair(#[from] PairError),
    #[error("acquisition failed: {0}")]
    Acquisition(#[from] AcquisitionError),
    #[error("emulator update failed: {0}")]
    Emulator(#[from] EmulatorError),
}
