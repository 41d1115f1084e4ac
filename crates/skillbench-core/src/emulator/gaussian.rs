//! Closed-form Gaussian belief updates for a single two-team match.
//!
//! The update is the two-team special case of the TrueSkill factor graph: the
//! performance difference is a Gaussian truncated to the observed outcome
//! (above the draw margin for a win, inside it for a draw), and the `v`/`w`
//! correction terms move each mean and shrink each variance.

use std::f64::consts::SQRT_2;

use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use thiserror::Error;

use super::MatchOutcome;

/// Gaussian belief about a single skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub mu: f64,
    pub sigma: f64,
}

impl Belief {
    pub const fn new(mu: f64, sigma: f64) -> Self {
        Self { mu, sigma }
    }

    pub fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }

    pub fn is_valid(&self) -> bool {
        self.mu.is_finite() && self.sigma.is_finite() && self.sigma > 0.0
    }
}

/// Probability that the side rated `side1` beats the side rated `side2`.
///
/// Each side may carry several raters: means are summed per side, variances
/// over both sides, and every rater contributes one `beta²` of performance
/// noise.
pub fn win_probability(side1: &[Belief], side2: &[Belief], beta: f64) -> f64 {
    let delta_mu: f64 =
        side1.iter().map(|r| r.mu).sum::<f64>() - side2.iter().map(|r| r.mu).sum::<f64>();
    let sum_variance: f64 = side1.iter().chain(side2).map(Belief::variance).sum();
    let size = (side1.len() + side2.len()) as f64;
    let denom = (size * beta * beta + sum_variance).sqrt();
    cdf(delta_mu / denom)
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{0}")]
pub struct UnstableUpdate(pub String);

/// Numerical routine turning two prior beliefs and an outcome into posteriors.
///
/// Implementations must move the winner's mean up when it beats expectation,
/// shrink uncertainty for informative observations, and produce the mirror
/// image update when the pair and outcome are swapped.
pub trait RatingBackend: Send + Sync {
    fn rate(
        &self,
        first: &Belief,
        second: &Belief,
        outcome: MatchOutcome,
    ) -> Result<(Belief, Belief), UnstableUpdate>;
}

/// Exact two-team TrueSkill update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBackend {
    pub beta: f64,
    pub tau: f64,
    pub draw_probability: f64,
    pub min_sigma: f64,
}

impl GaussianBackend {
    /// Draw margin in skill units for a one-against-one match.
    ///
    /// `draw_probability` is clamped to `[0, 1]` first.
    pub fn draw_margin(&self) -> f64 {
        let p = self.draw_probability.clamp(0.0, 1.0);
        ppf((p + 1.0) / 2.0) * SQRT_2 * self.beta
    }
}

impl RatingBackend for GaussianBackend {
    fn rate(
        &self,
        first: &Belief,
        second: &Belief,
        outcome: MatchOutcome,
    ) -> Result<(Belief, Belief), UnstableUpdate> {
        if outcome == MatchOutcome::SecondWins {
            let (second, first) = self.rate(second, first, MatchOutcome::FirstWins)?;
            return Ok((first, second));
        }

        let tau_sq = self.tau * self.tau;
        let var1 = first.variance() + tau_sq;
        let var2 = second.variance() + tau_sq;
        let c_sq = 2.0 * self.beta * self.beta + var1 + var2;
        let c = c_sq.sqrt();

        let t = (first.mu - second.mu) / c;
        let e = self.draw_margin() / c;
        let (v, w) = match outcome {
            MatchOutcome::Draw => (v_draw(t, e), w_draw(t, e)?),
            _ => (v_win(t, e), w_win(t, e)),
        };

        let mu1 = first.mu + var1 / c * v;
        let mu2 = second.mu - var2 / c * v;
        let sigma1 = self.shrink(var1, c_sq, w)?;
        let sigma2 = self.shrink(var2, c_sq, w)?;

        let posterior = (Belief::new(mu1, sigma1), Belief::new(mu2, sigma2));
        if !posterior.0.is_valid() || !posterior.1.is_valid() {
            return Err(UnstableUpdate(format!(
                "posterior ({mu1}, {sigma1}) / ({mu2}, {sigma2}) is not finite"
            )));
        }
        Ok(posterior)
    }
}

impl GaussianBackend {
    fn shrink(&self, variance: f64, c_sq: f64, w: f64) -> Result<f64, UnstableUpdate> {
        let posterior = variance * (1.0 - variance / c_sq * w);
        if !posterior.is_finite() || posterior <= 0.0 {
            return Err(UnstableUpdate(format!(
                "variance {variance} collapsed to {posterior} (w = {w})"
            )));
        }
        Ok(posterior.sqrt().max(self.min_sigma))
    }
}

fn standard_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("unit normal parameters are valid")
}

fn pdf(x: f64) -> f64 {
    standard_normal().pdf(x)
}

fn cdf(x: f64) -> f64 {
    standard_normal().cdf(x)
}

fn ppf(p: f64) -> f64 {
    standard_normal().inverse_cdf(p)
}

fn v_win(t: f64, e: f64) -> f64 {
    let x = t - e;
    let denom = cdf(x);
    if denom > 0.0 { pdf(x) / denom } else { -x }
}

fn w_win(t: f64, e: f64) -> f64 {
    let x = t - e;
    if cdf(x) > 0.0 {
        let v = v_win(t, e);
        v * (v + x)
    } else if x < 0.0 {
        1.0
    } else {
        0.0
    }
}

fn v_draw(t: f64, e: f64) -> f64 {
    let abs_t = t.abs();
    let (a, b) = (e - abs_t, -e - abs_t);
    let denom = cdf(a) - cdf(b);
    let v = if denom > 0.0 { (pdf(b) - pdf(a)) / denom } else { a };
    if t < 0.0 { -v } else { v }
}

fn w_draw(t: f64, e: f64) -> Result<f64, UnstableUpdate> {
    let abs_t = t.abs();
    let (a, b) = (e - abs_t, -e - abs_t);
    let denom = cdf(a) - cdf(b);
    if denom <= 0.0 {
        return Err(UnstableUpdate(format!(
            "draw window is empty (t = {t}, margin = {e})"
        )));
    }
    let v = v_draw(abs_t, e);
    Ok(v * v + (a * pdf(a) - b * pdf(b)) / denom)
}
