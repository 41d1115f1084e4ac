use skillbench_core::{
    Emulator, EmulatorError, EmulatorKind, StaticEmulator, TrueSkillConfig, TrueSkillEmulator,
};
use thiserror::Error;

use crate::config::EmulatorConfig;

#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("invalid true_skill parameters for emulator '{name}': {source}")]
    TrueSkillParams {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("emulator '{name}' does not take parameters (found {found})")]
    UnexpectedParams { name: String, found: String },
    #[error("emulator '{name}' rejected its configuration: {source}")]
    Emulator {
        name: String,
        #[source]
        source: EmulatorError,
    },
}

/// Validated recipe for a fresh emulator; every run starts from its own copy.
pub(crate) struct EmulatorBlueprint {
    pub(crate) label: String,
    template: EmulatorTemplate,
}

enum EmulatorTemplate {
    TrueSkill(TrueSkillEmulator),
    Static,
}

impl EmulatorBlueprint {
    pub(crate) fn from_configs(configs: &[EmulatorConfig]) -> Result<Vec<Self>, BlueprintError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &EmulatorConfig) -> Result<Self, BlueprintError> {
        let template = match config.kind {
            EmulatorKind::TrueSkill => {
                let params = trueskill_params(&config.name, &config.params)?;
                let emulator =
                    TrueSkillEmulator::new(params).map_err(|source| BlueprintError::Emulator {
                        name: config.name.clone(),
                        source,
                    })?;
                EmulatorTemplate::TrueSkill(emulator)
            }
            EmulatorKind::Static => {
                if let Some(mapping) = config.params.as_mapping().filter(|m| !m.is_empty()) {
                    let keys = mapping
                        .keys()
                        .filter_map(|key| key.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(BlueprintError::UnexpectedParams {
                        name: config.name.clone(),
                        found: keys,
                    });
                }
                EmulatorTemplate::Static
            }
        };

        Ok(Self {
            label: config.name.clone(),
            template,
        })
    }

    pub(crate) fn kind(&self) -> EmulatorKind {
        match self.template {
            EmulatorTemplate::TrueSkill(_) => EmulatorKind::TrueSkill,
            EmulatorTemplate::Static => EmulatorKind::Static,
        }
    }

    pub(crate) fn spawn(&self) -> Box<dyn Emulator> {
        match &self.template {
            EmulatorTemplate::TrueSkill(emulator) => Box::new(emulator.clone()),
            EmulatorTemplate::Static => Box::new(StaticEmulator::new()),
        }
    }
}

fn trueskill_params(
    name: &str,
    params: &serde_yaml::Value,
) -> Result<TrueSkillConfig, BlueprintError> {
    if params.is_null() {
        return Ok(TrueSkillConfig::default());
    }
    serde_yaml::from_value(params.clone()).map_err(|source| BlueprintError::TrueSkillParams {
        name: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::iter::FromIterator;

    fn config(kind: EmulatorKind, params: serde_yaml::Value) -> EmulatorConfig {
        EmulatorConfig {
            name: "emu".to_string(),
            kind,
            params,
        }
    }

    fn mapping(key: &str, value: serde_yaml::Value) -> serde_yaml::Value {
        serde_yaml::Value::Mapping(serde_yaml::Mapping::from_iter([(
            serde_yaml::Value::String(key.into()),
            value,
        )]))
    }

    #[test]
    fn trueskill_params_default_when_empty() {
        let params = serde_yaml::Value::Mapping(Default::default());
        let blueprint =
            EmulatorBlueprint::from_config(&config(EmulatorKind::TrueSkill, params)).unwrap();
        let emulator = blueprint.spawn();
        assert_eq!(emulator.kind(), EmulatorKind::TrueSkill);
        assert_eq!(
            emulator.name(),
            TrueSkillEmulator::default().name(),
            "empty params should yield the default prior"
        );
    }

    #[test]
    fn trueskill_params_override_fields() {
        let params = mapping("beta", serde_yaml::Value::from(2.5));
        let blueprint =
            EmulatorBlueprint::from_config(&config(EmulatorKind::TrueSkill, params)).unwrap();
        assert!(blueprint.spawn().name().contains("beta=2.5"));
    }

    #[test]
    fn trueskill_rejects_unknown_shape() {
        let params = mapping("beta", serde_yaml::Value::from("wide"));
        let err = EmulatorBlueprint::from_config(&config(EmulatorKind::TrueSkill, params))
            .err()
            .expect("string beta should fail");
        assert!(matches!(err, BlueprintError::TrueSkillParams { .. }));
    }

    #[test]
    fn trueskill_rejects_out_of_range_values() {
        let params = mapping("sigma", serde_yaml::Value::from(-1.0));
        let err = EmulatorBlueprint::from_config(&config(EmulatorKind::TrueSkill, params))
            .err()
            .expect("negative sigma should fail");
        assert!(matches!(
            err,
            BlueprintError::Emulator {
                source: EmulatorError::InvalidConfig { field: "sigma", .. },
                ..
            }
        ));
    }

    #[test]
    fn static_rejects_params() {
        let params = mapping("mu", serde_yaml::Value::from(1.0));
        let err = EmulatorBlueprint::from_config(&config(EmulatorKind::Static, params))
            .err()
            .expect("static takes no params");
        assert!(matches!(err, BlueprintError::UnexpectedParams { .. }));
    }

    #[test]
    fn spawned_emulators_are_independent() {
        let blueprint = EmulatorBlueprint::from_config(&config(
            EmulatorKind::TrueSkill,
            serde_yaml::Value::Null,
        ))
        .unwrap();
        let pair = skillbench_core::TeamPair::ordered("A".into(), "B".into()).unwrap();

        let mut first = blueprint.spawn();
        first.fit_one_match(&pair, None).unwrap();
        let second = blueprint.spawn();

        assert_eq!(first.counters().matches(), 1);
        assert_eq!(second.counters().matches(), 0);
    }
}
