//! Validation and normalization of model configuration input.
//!
//! Every record entering or leaving the store passes through
//! [`ModelConfigFactory::make_config`]. Invalid input is rejected, never
//! silently repaired.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use super::config::{ConfigInput, ModelConfig};
use super::store::METADATA_KEY;
use super::taxonomy::{ModelFormat, ModelType, ModelVariant};

/// Errors raised while validating a model configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Malformed model config: {0}")]
    Malformed(String),

    #[error("Model config is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid model key: {0}")]
    InvalidKey(String),

    #[error("Model type '{model_type}' cannot use format '{model_format}'")]
    IncompatibleFormat {
        model_type: ModelType,
        model_format: ModelFormat,
    },

    #[error("Checkpoint main models require a 'config' field")]
    MissingCheckpointConfig,
}

/// Fields every raw mapping must carry.
const REQUIRED_FIELDS: &[&str] = &["name", "base_model", "model_type", "model_format", "path"];

/// Turns raw mappings and existing records into canonical `ModelConfig`s.
pub struct ModelConfigFactory;

impl ModelConfigFactory {
    /// Validate `input` and stamp it with `key`.
    pub fn make_config(
        input: impl Into<ConfigInput>,
        key: &str,
    ) -> Result<ModelConfig, ConfigError> {
        validate_key(key)?;

        let mut record = match input.into() {
            ConfigInput::Record(record) => record,
            ConfigInput::Raw(raw) => Self::from_mapping(raw)?,
        };
        record.key = key.to_string();

        normalize(&mut record);
        validate(&record)?;
        Ok(record)
    }

    /// Convert a validated record back into the plain mapping stored on disk.
    pub fn to_mapping(record: &ModelConfig) -> Result<Mapping, ConfigError> {
        match serde_yaml::to_value(record) {
            Ok(Value::Mapping(map)) => Ok(map),
            Ok(_) => Err(ConfigError::Malformed("record did not serialize to a mapping".into())),
            Err(e) => Err(ConfigError::Malformed(e.to_string())),
        }
    }

    fn from_mapping(raw: Mapping) -> Result<ModelConfig, ConfigError> {
        for field in REQUIRED_FIELDS {
            match raw.get(*field) {
                None | Some(Value::Null) => return Err(ConfigError::MissingField(field)),
                Some(_) => {}
            }
        }
        serde_yaml::from_value(Value::Mapping(raw)).map_err(|e| ConfigError::Malformed(e.to_string()))
    }
}

fn validate_key(key: &str) -> Result<(), ConfigError> {
    if key.trim().is_empty() {
        return Err(ConfigError::InvalidKey("key cannot be empty".into()));
    }
    if key == METADATA_KEY {
        return Err(ConfigError::InvalidKey(format!("'{}' is reserved", METADATA_KEY)));
    }
    Ok(())
}

fn normalize(record: &mut ModelConfig) {
    record.name = record.name.trim().to_string();
    record.tags = std::mem::take(&mut record.tags)
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let main_weights = matches!(
        record.model_format,
        ModelFormat::Checkpoint | ModelFormat::Diffusers
    );
    if record.model_type == ModelType::Main && main_weights && record.variant.is_none() {
        record.variant = Some(ModelVariant::Normal);
    }
}

fn validate(record: &ModelConfig) -> Result<(), ConfigError> {
    if record.name.is_empty() {
        return Err(ConfigError::MissingField("name"));
    }
    if record.path.as_os_str().is_empty() {
        return Err(ConfigError::MissingField("path"));
    }
    if !record.model_type.supports(record.model_format) {
        return Err(ConfigError::IncompatibleFormat {
            model_type: record.model_type,
            model_format: record.model_format,
        });
    }
    if record.model_type == ModelType::Main
        && record.model_format == ModelFormat::Checkpoint
        && record.config.as_deref().map_or(true, |c| c.trim().is_empty())
    {
        return Err(ConfigError::MissingCheckpointConfig);
    }
    Ok(())
}
