//! Acquisition functions: rank candidate matchups by how much observing them
//! is worth under the emulator's current state.

mod least_seen;
mod uncertainty;

pub use least_seen::LeastSeen;
pub use uncertainty::MaxUncertainty;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::data::TeamPair;
use crate::emulator::{Emulator, EmulatorKind};

/// Closed set of acquisition strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquirerKind {
    LeastSeen,
    MaxUncertainty,
}

impl AcquirerKind {
    pub fn build(self) -> Box<dyn AcquisitionFunction> {
        match self {
            AcquirerKind::LeastSeen => Box::new(LeastSeen),
            AcquirerKind::MaxUncertainty => Box::new(MaxUncertainty),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("acquisition function '{acquirer}' cannot score emulator '{emulator}' ({kind:?})")]
    Compatibility {
        acquirer: String,
        emulator: String,
        kind: EmulatorKind,
    },
}

/// Scores a candidate matchup; higher means observe it sooner.
pub trait AcquisitionFunction: Send + Sync {
    fn kind(&self) -> AcquirerKind;

    fn name(&self) -> String;

    /// Emulator variants this strategy knows how to read.
    fn compatible_emulators(&self) -> &'static [EmulatorKind];

    /// Strategy-specific score. Only reached through [`score`](Self::score),
    /// which has already checked compatibility.
    fn evaluate(&self, emulator: &dyn Emulator, teams: &TeamPair) -> f64;

    fn is_compatible(&self, emulator: &dyn Emulator) -> bool {
        self.compatible_emulators().contains(&emulator.kind())
    }

    fn score(&self, emulator: &dyn Emulator, teams: &TeamPair) -> Result<f64, AcquisitionError> {
        if !self.is_compatible(emulator) {
            debug!(
                target: "skillbench_core::acquirer",
                acquirer = %self.name(),
                emulator = %emulator.name(),
                "rejected incompatible emulator"
            );
            return Err(AcquisitionError::Compatibility {
                acquirer: self.name(),
                emulator: emulator.name(),
                kind: emulator.kind(),
            });
        }
        Ok(self.evaluate(emulator, teams))
    }
}

/// Highest-scoring candidate and its score.
///
/// Ties keep the earliest candidate, so passing candidates in a stable order
/// (such as [`all_pairs`](crate::data::all_pairs)) makes the choice
/// deterministic. Returns `Ok(None)` when there are no candidates.
pub fn best_pair<'a>(
    acquirer: &dyn AcquisitionFunction,
    emulator: &dyn Emulator,
    candidates: &'a [TeamPair],
) -> Result<Option<(&'a TeamPair, f64)>, AcquisitionError> {
    let mut best: Option<(&TeamPair, f64)> = None;
    for pair in candidates {
        let score = acquirer.score(emulator, pair)?;
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((pair, score)),
        }
    }
    Ok(best)
}
