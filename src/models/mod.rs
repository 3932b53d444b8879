//! Model configuration management.
//!
//! Handles the model taxonomy, record validation and the persistent
//! configuration store.

pub mod config;
pub mod factory;
pub mod store;
pub mod taxonomy;

pub use config::{ConfigInput, ModelConfig};
pub use factory::{ConfigError, ModelConfigFactory};
pub use store::{
    ModelConfigStore, ModelQuery, StoreError, YamlModelStore, CONFIG_FILE_VERSION, METADATA_KEY,
};
pub use taxonomy::{BaseModelType, ModelFormat, ModelType, ModelVariant, UnknownVariant};
