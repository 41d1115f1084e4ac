//! Sources of match results for a driver to feed into emulators.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::data::{PairError, Team, TeamPair};
use crate::emulator::{Belief, win_probability};

/// Produces the winner of a matchup, or `None` for a draw.
pub trait OutcomeSource {
    fn play(&mut self, teams: &TeamPair) -> Option<Team>;
}

#[derive(Debug, Error, PartialEq)]
pub enum LeagueError {
    #[error("team '{0}' is listed more than once")]
    DuplicateTeam(Team),
    #[error("team '{team}' has a non-finite skill {skill}")]
    InvalidSkill { team: Team, skill: f64 },
    #[error("{field} must be in [0, 1), got {value}")]
    InvalidProbability { field: &'static str, value: f64 },
    #[error("beta must be positive, got {0}")]
    InvalidBeta(f64),
}

/// Ground truth league: fixed hidden skills plus seeded performance noise.
///
/// The first team wins with probability `Φ((s1 − s2) / (√2 β))` once draws,
/// which occur at a flat `draw_rate`, are ruled out.
#[derive(Debug, Clone)]
pub struct SimulatedLeague {
    skills: HashMap<Team, f64>,
    order: Vec<Team>,
    beta: f64,
    draw_rate: f64,
    rng: StdRng,
}

impl SimulatedLeague {
    pub fn new(
        skills: impl IntoIterator<Item = (Team, f64)>,
        beta: f64,
        draw_rate: f64,
        seed: u64,
    ) -> Result<Self, LeagueError> {
        if !(beta.is_finite() && beta > 0.0) {
            return Err(LeagueError::InvalidBeta(beta));
        }
        if !(0.0..1.0).contains(&draw_rate) {
            return Err(LeagueError::InvalidProbability {
                field: "draw_rate",
                value: draw_rate,
            });
        }

        let mut map = HashMap::new();
        let mut order = Vec::new();
        for (team, skill) in skills {
            if !skill.is_finite() {
                return Err(LeagueError::InvalidSkill { team, skill });
            }
            if map.insert(team.clone(), skill).is_some() {
                return Err(LeagueError::DuplicateTeam(team));
            }
            order.push(team);
        }

        Ok(Self {
            skills: map,
            order,
            beta,
            draw_rate,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Teams in the order they were registered.
    pub fn teams(&self) -> &[Team] {
        &self.order
    }

    /// Hidden skill of `team`; unknown teams sit at zero.
    pub fn skill(&self, team: &Team) -> f64 {
        self.skills.get(team).copied().unwrap_or(0.0)
    }

    /// Probability that `team1` beats `team2`, ignoring draws.
    pub fn true_win_probability(&self, team1: &Team, team2: &Team) -> f64 {
        win_probability(
            &[Belief::new(self.skill(team1), 0.0)],
            &[Belief::new(self.skill(team2), 0.0)],
            self.beta,
        )
    }

    /// Draws a fair presentation order for `a` and `b` from the league's RNG.
    pub fn pair(&mut self, a: Team, b: Team) -> Result<TeamPair, PairError> {
        TeamPair::new(a, b, &mut self.rng)
    }
}

impl OutcomeSource for SimulatedLeague {
    fn play(&mut self, teams: &TeamPair) -> Option<Team> {
        let (first, second) = teams.teams();
        if self.draw_rate > 0.0 && self.rng.gen_bool(self.draw_rate) {
            return None;
        }
        let p = self.true_win_probability(first, second).clamp(0.0, 1.0);
        if self.rng.gen_bool(p) {
            Some(first.clone())
        } else {
            Some(second.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn league(draw_rate: f64, seed: u64) -> SimulatedLeague {
        SimulatedLeague::new(
            [
                (Team::new("strong"), 40.0),
                (Team::new("average"), 25.0),
                (Team::new("weak"), 10.0),
            ],
            25.0 / 6.0,
            draw_rate,
            seed,
        )
        .unwrap()
    }

    #[test]
    fn stronger_team_wins_most_matches() {
        let mut league = league(0.0, 11);
        let pair = TeamPair::ordered(Team::new("weak"), Team::new("strong")).unwrap();
        let strong_wins = (0..200)
            .filter(|_| league.play(&pair) == Some(Team::new("strong")))
            .count();
        assert!(strong_wins > 180, "strong won {strong_wins}/200");
    }

    #[test]
    fn same_seed_replays_same_results() {
        let pair = TeamPair::ordered(Team::new("average"), Team::new("weak")).unwrap();
        let run = |seed| {
            let mut league = league(0.2, seed);
            (0..50).map(|_| league.play(&pair)).collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));
        assert!(run(5).iter().any(Option::is_none));
    }

    #[test]
    fn true_probability_is_symmetric() {
        let league = league(0.0, 0);
        let a = Team::new("strong");
        let b = Team::new("average");
        let total = league.true_win_probability(&a, &b) + league.true_win_probability(&b, &a);
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_construction() {
        let dup = SimulatedLeague::new(
            [(Team::new("A"), 1.0), (Team::new("A"), 2.0)],
            1.0,
            0.0,
            0,
        );
        assert_eq!(dup.unwrap_err(), LeagueError::DuplicateTeam(Team::new("A")));

        let draws = SimulatedLeague::new([(Team::new("A"), 1.0)], 1.0, 1.0, 0);
        assert!(matches!(
            draws.unwrap_err(),
            LeagueError::InvalidProbability { field: "draw_rate", .. }
        ));
    }
}
