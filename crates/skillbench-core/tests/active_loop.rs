use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use skillbench_core::{
    AcquisitionFunction, Emulator, LeastSeen, MaxUncertainty, OutcomeSource, SimulatedLeague,
    StaticEmulator, Team, TeamPair, TrueSkillEmulator, all_pairs, best_pair,
};

fn team(name: &str) -> Team {
    Team::new(name)
}

#[test]
fn single_win_from_scratch() {
    let mut emu = TrueSkillEmulator::default();
    let mut rng = StdRng::seed_from_u64(2024);
    let pair = TeamPair::new(team("A"), team("B"), &mut rng).expect("distinct teams");

    emu.fit_one_match(&pair, Some(&team("A"))).expect("fit succeeds");

    assert!(emu.emulate(&team("A"), &team("B")) > 0.5);
    let counts: HashMap<String, u64> = emu
        .counters()
        .team_fit_count()
        .iter()
        .map(|(team, count)| (team.name().to_string(), *count))
        .collect();
    assert_eq!(
        counts,
        HashMap::from([("A".to_string(), 1), ("B".to_string(), 1)])
    );
}

#[test]
fn branch_copies_do_not_alias() {
    let mut trunk = TrueSkillEmulator::default();
    let ab = TeamPair::ordered(team("A"), team("B")).unwrap();
    trunk.fit_one_match(&ab, Some(&team("A"))).unwrap();

    let mut left = trunk.clone();
    let mut right = trunk.clone();
    left.fit_one_match(&ab, Some(&team("A"))).unwrap();
    right.fit_one_match(&ab, Some(&team("B"))).unwrap();

    assert_eq!(trunk.team_fit_count(&team("A")), 1);
    assert_eq!(left.team_fit_count(&team("A")), 2);
    assert_eq!(right.team_fit_count(&team("A")), 2);
    assert!(left.rating(&team("A")).mu > trunk.rating(&team("A")).mu);
    assert!(right.rating(&team("A")).mu < trunk.rating(&team("A")).mu);
}

fn run_loop(acquirer: &dyn AcquisitionFunction, rounds: usize) -> TrueSkillEmulator {
    let skills = [("ace", 38.0), ("ben", 30.0), ("cal", 24.0), ("dot", 18.0), ("eve", 10.0)];
    let mut league = SimulatedLeague::new(
        skills.iter().map(|(name, skill)| (team(name), *skill)),
        25.0 / 6.0,
        0.0,
        77,
    )
    .unwrap();
    let candidates = all_pairs(league.teams());
    let mut emu = TrueSkillEmulator::default();

    for _ in 0..rounds {
        let (pair, _) = best_pair(acquirer, &emu, &candidates)
            .expect("compatible")
            .expect("candidates exist");
        let (a, b) = pair.teams();
        let pair = league.pair(a.clone(), b.clone()).unwrap();
        let winner = league.play(&pair);
        emu.fit_one_match(&pair, winner.as_ref()).unwrap();
    }
    emu
}

#[test]
fn least_seen_spreads_observations_evenly() {
    let emu = run_loop(&LeastSeen, 50);
    let counts: Vec<u64> = emu.counters().team_fit_count().values().copied().collect();
    assert_eq!(counts.len(), 5);
    let min = counts.iter().min().copied().unwrap();
    let max = counts.iter().max().copied().unwrap();
    assert!(max - min <= 1, "counts {counts:?}");
    assert_eq!(emu.counters().matches(), 50);
}

#[test]
fn least_seen_loop_recovers_strongest_and_weakest() {
    let emu = run_loop(&LeastSeen, 120);
    let snapshot = emu.snapshot();
    let best = snapshot.iter().max_by(|a, b| a.mu.total_cmp(&b.mu)).unwrap();
    let worst = snapshot.iter().min_by(|a, b| a.mu.total_cmp(&b.mu)).unwrap();
    assert_eq!(best.team.name(), "ace");
    assert_eq!(worst.team.name(), "eve");
}

#[test]
fn uncertainty_loop_separates_extremes() {
    let emu = run_loop(&MaxUncertainty, 120);
    assert!(emu.rating(&team("ace")).mu > emu.rating(&team("eve")).mu);
    assert!(emu.rating(&team("ace")).sigma < emu.config().sigma);
    assert_eq!(emu.counters().matches(), 120);
}

#[test]
fn incompatible_pairing_fails_before_scoring() {
    let emu = StaticEmulator::new();
    let pair = TeamPair::ordered(team("A"), team("B")).unwrap();
    assert!(MaxUncertainty.score(&emu, &pair).is_err());
    assert!(LeastSeen.score(&emu, &pair).is_ok());
}
