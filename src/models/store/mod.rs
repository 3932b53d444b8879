// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Persistent storage of model configuration records.
//!
//! The [`ModelConfigStore`] trait is the surface the rest of the application
//! programs against; [`YamlModelStore`] is the file-backed implementation.

mod yaml;

pub use yaml::YamlModelStore;

use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

use super::config::{ConfigInput, ModelConfig};
use super::factory::ConfigError;
use super::taxonomy::{BaseModelType, ModelType};

/// Format version written into, and required from, every document.
pub const CONFIG_FILE_VERSION: &str = "3.2.0";

/// Reserved document key holding the metadata entry.
pub const METADATA_KEY: &str = "__metadata__";

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Config file version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },

    #[error(
        "Can't save {name} because a model named '{existing}' is already stored with the same key '{key}'"
    )]
    DuplicateModel {
        key: String,
        name: String,
        existing: String,
    },

    #[error("Unknown key '{0}' for model config")]
    UnknownModel(String),

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

impl StoreError {
    /// True when the requested key does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownModel(_))
    }

    /// True when the key is already taken.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateModel { .. })
    }
}

/// Filters for [`ModelConfigStore::search_by_name`]. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelQuery {
    pub name: Option<String>,
    pub base_model: Option<BaseModelType>,
    pub model_type: Option<ModelType>,
}

impl ModelQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn base_model(mut self, base: BaseModelType) -> Self {
        self.base_model = Some(base);
        self
    }

    pub fn model_type(mut self, model_type: ModelType) -> Self {
        self.model_type = Some(model_type);
        self
    }

    /// Check a record against every set filter.
    pub fn matches(&self, record: &ModelConfig) -> bool {
        if let Some(name) = &self.name {
            if &record.name != name {
                return false;
            }
        }
        if let Some(base) = self.base_model {
            if record.base_model != base {
                return false;
            }
        }
        if let Some(model_type) = self.model_type {
            if record.model_type != model_type {
                return false;
            }
        }
        true
    }
}

/// Keyed registry of model configurations.
pub trait ModelConfigStore: Send + Sync {
    /// Format version of the open document.
    fn version(&self) -> &str;

    /// Add a record under a new key, returning the stored record.
    fn add(&self, key: &str, config: ConfigInput) -> Result<ModelConfig, StoreError>;

    /// Replace the record at an existing key, returning the stored record.
    fn update(&self, key: &str, config: ConfigInput) -> Result<ModelConfig, StoreError>;

    /// Remove the record at `key`.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Fetch the record at `key`.
    fn get(&self, key: &str) -> Result<ModelConfig, StoreError>;

    /// Whether a record is stored under `key`.
    fn exists(&self, key: &str) -> bool;

    /// Every stored record, in document order.
    fn all_models(&self) -> Result<Vec<ModelConfig>, StoreError>;

    /// Records carrying every tag in `tags`.
    fn search_by_tag(&self, tags: &BTreeSet<String>) -> Result<Vec<ModelConfig>, StoreError>;

    /// Records matching every filter set in `query`.
    fn search_by_name(&self, query: &ModelQuery) -> Result<Vec<ModelConfig>, StoreError>;

    /// First record whose path equals `path`, if any.
    fn search_by_path(&self, path: &Path) -> Result<Option<ModelConfig>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::taxonomy::ModelFormat;

    fn record() -> ModelConfig {
        ModelConfig::new(
            "vae-ft-mse",
            BaseModelType::StableDiffusion1,
            ModelType::Vae,
            ModelFormat::Diffusers,
            "/models/vae",
        )
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(ModelQuery::new().matches(&record()));
    }

    #[test]
    fn test_query_filters_are_conjunctive() {
        let q = ModelQuery::new()
            .base_model(BaseModelType::StableDiffusion1)
            .model_type(ModelType::Vae);
        assert!(q.matches(&record()));
        assert!(!q.clone().name("other").matches(&record()));
        assert!(!ModelQuery::new().model_type(ModelType::Lora).matches(&record()));
    }

    #[test]
    fn test_error_classification() {
        assert!(StoreError::UnknownModel("k".into()).is_not_found());
        let dup = StoreError::DuplicateModel {
            key: "k".into(),
            name: "a".into(),
            existing: "b".into(),
        };
        assert!(dup.is_conflict());
        assert!(!dup.is_not_found());
        assert_eq!(
            dup.to_string(),
            "Can't save a because a model named 'b' is already stored with the same key 'k'"
        );
    }
}
