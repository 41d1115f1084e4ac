use std::collections::HashMap;

use crate::data::{Team, TeamPair};

/// Observation bookkeeping carried by every emulator.
///
/// Cloning yields a fully independent copy; branches forked from a common
/// emulator never share counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitCounters {
    team_fit_count: HashMap<Team, u64>,
    matchup_fit_count: HashMap<TeamPair, u64>,
    team_fit_total: u64,
    // One rater per team for now, keyed by the team it plays for.
    player_fit_count: HashMap<Team, u64>,
    player_fit_total: u64,
}

impl FitCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, teams: &TeamPair) {
        for team in teams {
            *self.team_fit_count.entry(team.clone()).or_insert(0) += 1;
            *self.player_fit_count.entry(team.clone()).or_insert(0) += 1;
            self.team_fit_total += 1;
            self.player_fit_total += 1;
        }
        *self.matchup_fit_count.entry(teams.clone()).or_insert(0) += 1;
    }

    pub fn team_count(&self, team: &Team) -> u64 {
        self.team_fit_count.get(team).copied().unwrap_or(0)
    }

    pub fn matchup_count(&self, teams: &TeamPair) -> u64 {
        self.matchup_fit_count.get(teams).copied().unwrap_or(0)
    }

    pub fn team_fit_count(&self) -> &HashMap<Team, u64> {
        &self.team_fit_count
    }

    pub fn matchup_fit_count(&self) -> &HashMap<TeamPair, u64> {
        &self.matchup_fit_count
    }

    pub fn team_fit_total(&self) -> u64 {
        self.team_fit_total
    }

    pub fn player_fit_count(&self) -> &HashMap<Team, u64> {
        &self.player_fit_count
    }

    pub fn player_fit_total(&self) -> u64 {
        self.player_fit_total
    }

    /// Number of matches recorded.
    pub fn matches(&self) -> u64 {
        self.matchup_fit_count.values().sum()
    }
}
