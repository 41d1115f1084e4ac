use serde::Deserialize;
use skillbench_core::{AcquirerKind, EmulatorKind};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_ROUNDS: usize = 100;
const DEFAULT_LEAGUE_BETA: f64 = 25.0 / 6.0;
const DEFAULT_TELEMETRY_DIR: &str = "bench/out/{run_id}";
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root benchmark configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub league: LeagueConfig,
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    pub emulators: Vec<EmulatorConfig>,
    #[serde(default = "default_acquirers")]
    pub acquirers: Vec<AcquirerKind>,
    #[serde(default)]
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.league.validate()?;
        if self.rounds == 0 {
            return Err(ValidationError::InvalidField {
                field: "rounds".to_string(),
                message: "number of rounds must be greater than zero".to_string(),
            });
        }
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_emulators(&mut self.emulators)?;
        validate_acquirers(&mut self.acquirers)?;
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            telemetry_dir: resolve_template(&self.run_id, &self.outputs.telemetry_dir),
        }
    }
}

fn default_rounds() -> usize {
    DEFAULT_ROUNDS
}

fn default_acquirers() -> Vec<AcquirerKind> {
    vec![AcquirerKind::LeastSeen]
}

/// Ground-truth league the benchmark samples matches from.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LeagueConfig {
    pub seed: Option<u64>,
    #[serde(default = "default_league_beta")]
    pub beta: f64,
    #[serde(default)]
    pub draw_rate: f64,
    pub teams: Vec<TeamConfig>,
}

impl LeagueConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.teams.len() < 2 {
            return Err(ValidationError::InvalidField {
                field: "league.teams".to_string(),
                message: "at least two teams are required to form a matchup".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for team in &self.teams {
            if team.name.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: "league.teams.name".to_string(),
                    message: "team name must not be empty".to_string(),
                });
            }
            if !seen.insert(team.name.as_str()) {
                return Err(ValidationError::InvalidField {
                    field: "league.teams".to_string(),
                    message: format!("team '{}' defined more than once", team.name),
                });
            }
            if !team.skill.is_finite() {
                return Err(ValidationError::InvalidField {
                    field: format!("league.teams[{}].skill", team.name),
                    message: "skill must be a finite number".to_string(),
                });
            }
        }

        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(ValidationError::InvalidField {
                field: "league.beta".to_string(),
                message: "beta must be greater than zero".to_string(),
            });
        }

        if !(0.0..1.0).contains(&self.draw_rate) {
            return Err(ValidationError::InvalidField {
                field: "league.draw_rate".to_string(),
                message: "draw rate must be in [0, 1)".to_string(),
            });
        }

        Ok(())
    }
}

fn default_league_beta() -> f64 {
    DEFAULT_LEAGUE_BETA
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TeamConfig {
    pub name: String,
    pub skill: f64,
}

/// Definition of an emulator under test.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EmulatorConfig {
    pub name: String,
    pub kind: EmulatorKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    #[serde(default = "default_telemetry_dir")]
    pub telemetry_dir: String,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            telemetry_dir: default_telemetry_dir(),
        }
    }
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        if self.telemetry_dir.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "outputs.telemetry_dir".to_string(),
                message: "path must not be empty".to_string(),
            });
        }

        let resolved = resolve_template(run_id, &self.telemetry_dir);
        if resolved.components().count() == 0 {
            return Err(ValidationError::InvalidField {
                field: "outputs.telemetry_dir".to_string(),
                message: "resolved path is invalid".to_string(),
            });
        }
        Ok(())
    }
}

fn default_telemetry_dir() -> String {
    DEFAULT_TELEMETRY_DIR.to_string()
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    /// Emit one event per acquisition step in addition to per-run summaries.
    #[serde(default)]
    pub step_details: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            step_details: false,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_emulators(emulators: &mut [EmulatorConfig]) -> Result<(), ValidationError> {
    if emulators.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "emulators".to_string(),
            message: "at least one emulator must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for emulator in emulators.iter_mut() {
        if emulator.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "emulators.name".to_string(),
                message: "emulator name must not be empty".to_string(),
            });
        }

        if !emulator.name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
            return Err(ValidationError::InvalidField {
                field: format!("emulators[{}].name", emulator.name),
                message: "emulator name contains invalid characters".to_string(),
            });
        }

        if !seen.insert(emulator.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "emulators".to_string(),
                message: format!("emulator name '{}' defined more than once", emulator.name),
            });
        }

        if emulator.params.is_null() {
            emulator.params = serde_yaml::Value::Mapping(Default::default());
        }
    }

    Ok(())
}

fn validate_acquirers(acquirers: &mut Vec<AcquirerKind>) -> Result<(), ValidationError> {
    if acquirers.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "acquirers".to_string(),
            message: "at least one acquisition function must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    acquirers.retain(|kind| seen.insert(*kind));
    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub telemetry_dir: PathBuf,
}

impl ResolvedOutputs {
    pub fn telemetry_path(&self) -> PathBuf {
        self.telemetry_dir.join("telemetry.jsonl")
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "stage0_smoke"
league:
  seed: 123
  teams:
    - name: "reds"
      skill: 30.0
    - name: "blues"
      skill: 20.0
rounds: 40
emulators:
  - name: "trueskill"
    kind: "true_skill"
    params:
      beta: 4.0
  - name: "static"
    kind: "static"
acquirers: ["least_seen", "max_uncertainty"]
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.rounds, 40);
        assert_eq!(cfg.league.beta, DEFAULT_LEAGUE_BETA);
        assert_eq!(cfg.league.draw_rate, 0.0);
        assert_eq!(cfg.emulators[0].kind, EmulatorKind::TrueSkill);
        assert!(cfg.emulators[1].params.is_mapping());
        assert_eq!(
            cfg.acquirers,
            [AcquirerKind::LeastSeen, AcquirerKind::MaxUncertainty]
        );
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.telemetry_path(),
            PathBuf::from("bench/out/stage0_smoke/telemetry.jsonl")
        );
    }

    #[test]
    fn defaults_rounds_and_acquirers() {
        let yaml = BASIC_YAML
            .replace("rounds: 40\n", "")
            .replace("acquirers: [\"least_seen\", \"max_uncertainty\"]\n", "");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.rounds, DEFAULT_ROUNDS);
        assert_eq!(cfg.acquirers, [AcquirerKind::LeastSeen]);
    }

    #[test]
    fn rejects_single_team_league() {
        let yaml = BASIC_YAML.replace(
            "    - name: \"blues\"\n      skill: 20.0\n",
            "",
        );
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "league.teams"
        ));
    }

    #[test]
    fn rejects_duplicate_emulators() {
        let yaml = BASIC_YAML.replace("name: \"static\"", "name: \"trueskill\"");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("duplicate emulators should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "emulators"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("stage0_smoke", "stage 0 smoke");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn rejects_certain_draws() {
        let yaml = BASIC_YAML.replace("  seed: 123\n", "  seed: 123\n  draw_rate: 1.0\n");
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("draw rate out of range");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "league.draw_rate"
        ));
    }

    #[test]
    fn duplicate_acquirers_collapse() {
        let yaml = BASIC_YAML.replace(
            "acquirers: [\"least_seen\", \"max_uncertainty\"]",
            "acquirers: [\"least_seen\", \"least_seen\"]",
        );
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.acquirers, [AcquirerKind::LeastSeen]);
    }

    #[test]
    fn telemetry_dir_resolves_every_placeholder() {
        let yaml = format!(
            "{BASIC_YAML}outputs:\n  telemetry_dir: \"out/{{run_id}}/{{run_id}}\"\n"
        );
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(
            cfg.resolved_outputs().telemetry_dir,
            PathBuf::from("out/stage0_smoke/stage0_smoke")
        );
    }
}
