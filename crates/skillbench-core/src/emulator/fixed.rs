use super::{Emulator, EmulatorError, EmulatorKind, FitCounters};
use crate::data::{Team, TeamPair};

/// Baseline that always predicts the first-listed team wins.
///
/// Any variation in its predictions comes from the presentation order a
/// `TeamPair` was shuffled into. It learns nothing beyond the counters.
#[derive(Debug, Clone, Default)]
pub struct StaticEmulator {
    counters: FitCounters,
}

impl StaticEmulator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Emulator for StaticEmulator {
    fn kind(&self) -> EmulatorKind {
        EmulatorKind::Static
    }

    fn emulate(&self, _team1: &Team, _team2: &Team) -> f64 {
        1.0
    }

    fn fit_one_match(
        &mut self,
        teams: &TeamPair,
        _winner: Option<&Team>,
    ) -> Result<(), EmulatorError> {
        self.counters.record(teams);
        Ok(())
    }

    fn name(&self) -> String {
        "StaticEmulator".to_string()
    }

    fn counters(&self) -> &FitCounters {
        &self.counters
    }
}
