use skillbench_core::emulator::MatchOutcome;
use skillbench_core::{Emulator, SimulatedLeague, Team};

const CONFIDENCE_Z: f64 = 1.96; // 95% CI
const PROBABILITY_CLAMP: f64 = 1e-12;

/// Accumulates prediction quality for one (emulator, acquirer) run.
pub struct RunAnalytics {
    emulator: String,
    acquirer: String,
    brier: Vec<f64>,
    total_log_loss: f64,
    draws: usize,
}

impl RunAnalytics {
    pub fn new(emulator: impl Into<String>, acquirer: impl Into<String>) -> Self {
        Self {
            emulator: emulator.into(),
            acquirer: acquirer.into(),
            brier: Vec::new(),
            total_log_loss: 0.0,
            draws: 0,
        }
    }

    /// Records the prediction made for the first-listed team before the match was fit.
    pub fn record_step(&mut self, predicted_first: f64, outcome: MatchOutcome) {
        let observed = outcome.score();
        self.brier.push((predicted_first - observed).powi(2));

        let p = predicted_first.clamp(PROBABILITY_CLAMP, 1.0 - PROBABILITY_CLAMP);
        self.total_log_loss -= observed * p.ln() + (1.0 - observed) * (1.0 - p).ln();

        if outcome == MatchOutcome::Draw {
            self.draws += 1;
        }
    }

    pub fn finalize(self, emulator: &dyn Emulator, league: &SimulatedLeague) -> RunReport {
        let steps = self.brier.len();
        let mean_brier = mean(&self.brier);
        let brier_ci95 = confidence_interval(&self.brier);
        let mean_log_loss = if steps == 0 {
            0.0
        } else {
            self.total_log_loss / steps as f64
        };
        let teams_seen = league
            .teams()
            .iter()
            .filter(|team| emulator.team_fit_count(team) > 0)
            .count();

        RunReport {
            emulator: self.emulator,
            emulator_name: emulator.name(),
            acquirer: self.acquirer,
            steps,
            draws: self.draws,
            mean_brier,
            brier_ci95,
            mean_log_loss,
            ordering_accuracy: ordering_accuracy(emulator, league),
            teams_seen,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Configured emulator label.
    pub emulator: String,
    /// Emulator's own description of its hyper parameters.
    pub emulator_name: String,
    pub acquirer: String,
    pub steps: usize,
    pub draws: usize,
    pub mean_brier: f64,
    pub brier_ci95: (f64, f64),
    pub mean_log_loss: f64,
    /// Share of team pairs whose predicted favourite is the truly stronger team.
    pub ordering_accuracy: f64,
    pub teams_seen: usize,
}

/// Plain-text table of reports, one row per run.
pub fn render_table(reports: &[RunReport]) -> String {
    let mut rows = String::new();
    rows.push_str(&format!(
        "{:<20} {:<16} {:>6} {:>8} {:>19} {:>9} {:>9} {:>6}\n",
        "Emulator", "Acquirer", "Steps", "Brier", "95% CI", "LogLoss", "Ordering", "Seen"
    ));
    rows.push_str(&"-".repeat(100));
    rows.push('\n');

    for report in reports {
        rows.push_str(&format!(
            "{:<20} {:<16} {:>6} {:>8.4} [{:>7.4}, {:>7.4}] {:>9.4} {:>8.1}% {:>6}\n",
            report.emulator,
            report.acquirer,
            report.steps,
            report.mean_brier,
            report.brier_ci95.0,
            report.brier_ci95.1,
            report.mean_log_loss,
            report.ordering_accuracy * 100.0,
            report.teams_seen,
        ));
    }

    rows
}

fn ordering_accuracy(emulator: &dyn Emulator, league: &SimulatedLeague) -> f64 {
    let teams: &[Team] = league.teams();
    let mut credit = 0.0;
    let mut comparisons = 0usize;

    for (idx, a) in teams.iter().enumerate() {
        for b in &teams[idx + 1..] {
            let true_gap = league.skill(a) - league.skill(b);
            if true_gap == 0.0 {
                continue;
            }
            comparisons += 1;

            let predicted_gap = emulator.emulate(a, b) - 0.5;
            if predicted_gap == 0.0 {
                credit += 0.5;
            } else if predicted_gap.signum() == true_gap.signum() {
                credit += 1.0;
            }
        }
    }

    if comparisons == 0 {
        1.0
    } else {
        credit / comparisons as f64
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn confidence_interval(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = mean(values);
    if values.len() == 1 {
        return (mean, mean);
    }
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (values.len() as f64 - 1.0);
    let std_error = (variance / values.len() as f64).sqrt();
    let margin = CONFIDENCE_Z * std_error;
    (mean - margin, mean + margin)
}
