use super::{AcquirerKind, AcquisitionFunction};
use crate::data::TeamPair;
use crate::emulator::{Emulator, EmulatorKind};

/// Prefers uncertain teams in matchups whose result is hardest to call.
///
/// Score is `(σ1² + σ2²) · (1 − |2p − 1|)` where `p` is the emulator's win
/// probability for the pair. Needs per-team beliefs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxUncertainty;

const COMPATIBLE: [EmulatorKind; 1] = [EmulatorKind::TrueSkill];

impl AcquisitionFunction for MaxUncertainty {
    fn kind(&self) -> AcquirerKind {
        AcquirerKind::MaxUncertainty
    }

    fn name(&self) -> String {
        "MaxUncertainty".to_string()
    }

    fn compatible_emulators(&self) -> &'static [EmulatorKind] {
        &COMPATIBLE
    }

    fn evaluate(&self, emulator: &dyn Emulator, teams: &TeamPair) -> f64 {
        let (team1, team2) = teams.teams();
        // `score` only admits TrueSkill emulators, which always report a belief.
        let (Some(belief1), Some(belief2)) = (emulator.belief(team1), emulator.belief(team2))
        else {
            unreachable!("{} keeps no skill beliefs", emulator.name());
        };
        let p = emulator.emulate(team1, team2);
        let closeness = 1.0 - (2.0 * p - 1.0).abs();
        (belief1.variance() + belief2.variance()) * closeness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquirer::AcquisitionError;
    use crate::data::Team;
    use crate::emulator::{StaticEmulator, TrueSkillEmulator};

    fn pair(a: &str, b: &str) -> TeamPair {
        TeamPair::ordered(Team::new(a), Team::new(b)).unwrap()
    }

    #[test]
    fn rejects_static_emulator_before_scoring() {
        let emu = StaticEmulator::new();
        let err = MaxUncertainty.score(&emu, &pair("A", "B")).unwrap_err();
        assert_eq!(
            err,
            AcquisitionError::Compatibility {
                acquirer: "MaxUncertainty".to_string(),
                emulator: "StaticEmulator".to_string(),
                kind: EmulatorKind::Static,
            }
        );
    }

    #[test]
    #[should_panic(expected = "keeps no skill beliefs")]
    fn evaluate_without_beliefs_is_unreachable() {
        MaxUncertainty.evaluate(&StaticEmulator::new(), &pair("A", "B"));
    }

    #[test]
    fn unseen_pair_scores_full_prior_variance() {
        let emu = TrueSkillEmulator::default();
        let sigma = emu.config().sigma;
        let score = MaxUncertainty.score(&emu, &pair("A", "B")).unwrap();
        assert!((score - 2.0 * sigma * sigma).abs() < 1e-9);
    }

    #[test]
    fn observed_pair_scores_lower() {
        let mut emu = TrueSkillEmulator::default();
        for _ in 0..4 {
            emu.fit_one_match(&pair("A", "B"), Some(&Team::new("A")))
                .unwrap();
        }

        let seen = MaxUncertainty.score(&emu, &pair("A", "B")).unwrap();
        let unseen = MaxUncertainty.score(&emu, &pair("C", "D")).unwrap();
        assert!(seen < unseen);
        assert!(seen >= 0.0);
    }
}
