//! Teams and the matchups drawn between them.

use core::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier for a competing entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Team(Arc<str>);

impl Team {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Team {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairError {
    #[error("a matchup needs two distinct teams, got '{0}' twice")]
    Malformed(Team),
}

/// Unordered matchup between two distinct teams.
///
/// The pair remembers the order it was presented in (`first`, `second`), which
/// emulators consume, but equality and hashing ignore that order so `(a, b)`
/// and `(b, a)` key the same map entry.
#[derive(Debug, Clone)]
pub struct TeamPair {
    first: Team,
    second: Team,
}

impl TeamPair {
    /// Builds a pair whose presentation order is a fair coin flip drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(a: Team, b: Team, rng: &mut R) -> Result<Self, PairError> {
        let pair = Self::ordered(a, b)?;
        if rng.gen_bool(0.5) {
            Ok(pair.swapped())
        } else {
            Ok(pair)
        }
    }

    /// Builds a pair presented exactly as given.
    pub fn ordered(first: Team, second: Team) -> Result<Self, PairError> {
        if first == second {
            return Err(PairError::Malformed(first));
        }
        Ok(Self { first, second })
    }

    pub fn first(&self) -> &Team {
        &self.first
    }

    pub fn second(&self) -> &Team {
        &self.second
    }

    pub fn teams(&self) -> (&Team, &Team) {
        (&self.first, &self.second)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        [&self.first, &self.second].into_iter()
    }

    /// Same matchup with the presentation order reversed.
    pub fn swapped(self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }

    fn canonical(&self) -> (&Team, &Team) {
        if self.first <= self.second {
            (&self.first, &self.second)
        } else {
            (&self.second, &self.first)
        }
    }
}

impl PartialEq for TeamPair {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for TeamPair {}

impl Hash for TeamPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for TeamPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.first, self.second)
    }
}

impl<'a> IntoIterator for &'a TeamPair {
    type Item = &'a Team;
    type IntoIter = std::array::IntoIter<&'a Team, 2>;

    fn into_iter(self) -> Self::IntoIter {
        [&self.first, &self.second].into_iter()
    }
}

/// Every unordered pair of `teams`, in canonical sorted order.
///
/// Duplicate labels are collapsed first, so the result never contains a
/// malformed pair.
pub fn all_pairs(teams: &[Team]) -> Vec<TeamPair> {
    let mut sorted = teams.to_vec();
    sorted.sort();
    sorted.dedup();

    let mut pairs = Vec::with_capacity(sorted.len() * sorted.len().saturating_sub(1) / 2);
    for (idx, a) in sorted.iter().enumerate() {
        for b in &sorted[idx + 1..] {
            pairs.push(TeamPair {
                first: a.clone(),
                second: b.clone(),
            });
        }
    }
    pairs
}
