//! Skill estimation and active matchup selection.
//!
//! - `data`: `Team` and `TeamPair`, the matchup model.
//! - `emulator`: predictive skill models updated from observed matches.
//! - `acquirer`: strategies ranking which matchup to observe next.
//! - `outcome`: sources of match results (simulated ground truth).
//!
//! A driver alternates between scoring candidate pairs with an
//! [`acquirer::AcquisitionFunction`], playing the best one through an
//! [`outcome::OutcomeSource`], and fitting the result into an
//! [`emulator::Emulator`].

#![deny(warnings)]
pub mod acquirer;
pub mod data;
pub mod emulator;
pub mod outcome;

pub use acquirer::{
    AcquirerKind, AcquisitionError, AcquisitionFunction, LeastSeen, MaxUncertainty, best_pair,
};
pub use data::{PairError, Team, TeamPair, all_pairs};
pub use emulator::{
    Belief, Emulator, EmulatorError, EmulatorKind, FitCounters, StaticEmulator, TrueSkillConfig,
    TrueSkillEmulator,
};
pub use outcome::{LeagueError, OutcomeSource, SimulatedLeague};
