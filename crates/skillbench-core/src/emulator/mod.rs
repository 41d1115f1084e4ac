//! Skill emulators: predictive match models that learn from observed outcomes.
//!
//! This module is composed of:
//! - `counters`: observation bookkeeping shared by every emulator.
//! - `gaussian`: the closed-form two-team belief update behind `RatingBackend`.
//! - `trueskill`: Gaussian skill-belief tracker (`TrueSkillEmulator`).
//! - `fixed`: the prior-free `StaticEmulator` baseline.

mod counters;
mod fixed;
pub mod gaussian;
mod trueskill;

pub use counters::FitCounters;
pub use fixed::StaticEmulator;
pub use gaussian::{Belief, GaussianBackend, RatingBackend, UnstableUpdate, win_probability};
pub use trueskill::{RatingSink, RatingSnapshot, TrueSkillConfig, TrueSkillEmulator};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{Team, TeamPair};

/// Closed set of emulator variants, used for compatibility declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmulatorKind {
    TrueSkill,
    Static,
}

impl EmulatorKind {
    pub const ALL: [EmulatorKind; 2] = [EmulatorKind::TrueSkill, EmulatorKind::Static];
}

/// Outcome of a single match from the perspective of the pair's presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    FirstWins,
    SecondWins,
    Draw,
}

impl MatchOutcome {
    /// Anything other than one of the pair's teams is a draw.
    pub fn resolve(teams: &TeamPair, winner: Option<&Team>) -> Self {
        match winner {
            Some(team) if team == teams.first() => MatchOutcome::FirstWins,
            Some(team) if team == teams.second() => MatchOutcome::SecondWins,
            _ => MatchOutcome::Draw,
        }
    }

    pub fn mirrored(self) -> Self {
        match self {
            MatchOutcome::FirstWins => MatchOutcome::SecondWins,
            MatchOutcome::SecondWins => MatchOutcome::FirstWins,
            MatchOutcome::Draw => MatchOutcome::Draw,
        }
    }

    /// Observed score for the first team (1 win, 0.5 draw, 0 loss).
    pub fn score(self) -> f64 {
        match self {
            MatchOutcome::FirstWins => 1.0,
            MatchOutcome::SecondWins => 0.0,
            MatchOutcome::Draw => 0.5,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmulatorError {
    #[error("belief update for {pair} is numerically unstable: {detail}")]
    NumericalInstability { pair: String, detail: String },
    #[error("invalid emulator parameter {field} = {value}")]
    InvalidConfig { field: &'static str, value: f64 },
}

/// Unified interface for skill emulators.
///
/// Only `fit_one_match` mutates state; every other method is a pure read of
/// the current belief and counters.
pub trait Emulator: Send + Sync {
    fn kind(&self) -> EmulatorKind;

    /// Probability that `team1` defeats `team2` under the current belief.
    fn emulate(&self, team1: &Team, team2: &Team) -> f64;

    /// Learns from one observed match. `winner` of `None`, or a team outside
    /// the pair, is a draw. On error the emulator is left untouched.
    fn fit_one_match(&mut self, teams: &TeamPair, winner: Option<&Team>)
    -> Result<(), EmulatorError>;

    /// Label encoding the emulator's configuration.
    fn name(&self) -> String;

    fn counters(&self) -> &FitCounters;

    /// Current skill belief for `team` (the prior if unseen), for variants
    /// that keep beliefs.
    fn belief(&self, _team: &Team) -> Option<Belief> {
        None
    }

    fn team_fit_count(&self, team: &Team) -> u64 {
        self.counters().team_count(team)
    }
}
