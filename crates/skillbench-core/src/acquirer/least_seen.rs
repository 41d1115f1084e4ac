use super::{AcquirerKind, AcquisitionFunction};
use crate::data::TeamPair;
use crate::emulator::{Emulator, EmulatorKind};

/// Prefers matchups between the teams observed least so far.
///
/// Information about a team is taken to grow with the log of its match count,
/// so a pair's accumulated information is `ln(n1 + 1) + ln(n2 + 1)` and the
/// score is its negation. Only counters are read, so every emulator works.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSeen;

impl AcquisitionFunction for LeastSeen {
    fn kind(&self) -> AcquirerKind {
        AcquirerKind::LeastSeen
    }

    fn name(&self) -> String {
        "LeastSeen".to_string()
    }

    fn compatible_emulators(&self) -> &'static [EmulatorKind] {
        &EmulatorKind::ALL
    }

    fn evaluate(&self, emulator: &dyn Emulator, teams: &TeamPair) -> f64 {
        let (team1, team2) = teams.teams();
        let count1 = emulator.team_fit_count(team1) as f64;
        let count2 = emulator.team_fit_count(team2) as f64;
        -((count1 + 1.0).ln() + (count2 + 1.0).ln())
    }
}
