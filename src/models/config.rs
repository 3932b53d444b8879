//! Model configuration records.
//!
//! A `ModelConfig` is one model's entry in the store. The common fields are
//! typed; anything format-specific that the record does not name is kept in
//! `extra` and written back untouched.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use super::taxonomy::{BaseModelType, ModelFormat, ModelType, ModelVariant};

/// Configuration record for a single model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Unique key; always overwritten by the factory with the store key.
    #[serde(default, deserialize_with = "scalar::string")]
    pub key: String,
    /// Human-readable name.
    #[serde(deserialize_with = "scalar::string")]
    pub name: String,
    pub base_model: BaseModelType,
    pub model_type: ModelType,
    pub model_format: ModelFormat,
    /// Location of the weights on disk.
    pub path: PathBuf,
    #[serde(default, deserialize_with = "scalar::string_set")]
    pub tags: BTreeSet<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::optional_string"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::optional_string"
    )]
    pub author: Option<String>,
    /// License identifier (SPDX).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::optional_string"
    )]
    pub license: Option<String>,
    /// Where the model was installed from (URL, repo id or local path).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::optional_string"
    )]
    pub source: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::optional_string"
    )]
    pub thumbnail_url: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::optional_string"
    )]
    pub original_hash: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::optional_string"
    )]
    pub current_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<ModelVariant>,
    /// Legacy config file for checkpoint-format main models.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar::optional_string"
    )]
    pub config: Option<String>,
    /// Format-specific fields not covered above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ModelConfig {
    /// Create a record with only the required fields set.
    pub fn new(
        name: impl Into<String>,
        base_model: BaseModelType,
        model_type: ModelType,
        model_format: ModelFormat,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            key: String::new(),
            name: name.into(),
            base_model,
            model_type,
            model_format,
            path: path.into(),
            tags: BTreeSet::new(),
            description: None,
            author: None,
            license: None,
            source: None,
            thumbnail_url: None,
            original_hash: None,
            current_hash: None,
            variant: None,
            config: None,
            extra: BTreeMap::new(),
        }
    }

    /// Builder-style tag assignment.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether this record carries every tag in `wanted`.
    pub fn has_all_tags(&self, wanted: &BTreeSet<String>) -> bool {
        wanted.is_subset(&self.tags)
    }
}

/// Hand-edited YAML often leaves `name: 2024` or `author: true` unquoted;
/// string fields take any scalar in its plain string form.
mod scalar {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;
    use serde_yaml::Value;
    use std::collections::BTreeSet;

    fn to_string<E: Error>(value: Value) -> Result<String, E> {
        match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(E::custom(format!("expected a string, found {:?}", other))),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        to_string(Value::deserialize(de)?)
    }

    pub fn optional_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
        match Value::deserialize(de)? {
            Value::Null => Ok(None),
            value => to_string(value).map(Some),
        }
    }

    /// `tags:` with no value is an empty set.
    pub fn string_set<'de, D: Deserializer<'de>>(de: D) -> Result<BTreeSet<String>, D::Error> {
        match Value::deserialize(de)? {
            Value::Null => Ok(BTreeSet::new()),
            Value::Sequence(items) => items.into_iter().map(to_string).collect(),
            other => Err(D::Error::custom(format!("expected a list of tags, found {:?}", other))),
        }
    }
}

/// Input accepted by the factory: a raw field mapping or an existing record.
#[derive(Debug, Clone)]
pub enum ConfigInput {
    Raw(Mapping),
    Record(ModelConfig),
}

impl From<Mapping> for ConfigInput {
    fn from(raw: Mapping) -> Self {
        ConfigInput::Raw(raw)
    }
}

impl From<ModelConfig> for ConfigInput {
    fn from(record: ModelConfig) -> Self {
        ConfigInput::Record(record)
    }
}

impl From<&ModelConfig> for ConfigInput {
    fn from(record: &ModelConfig) -> Self {
        ConfigInput::Record(record.clone())
    }
}
