//! GG Model Store
//!
//! A file-backed registry of machine-learning model configuration records.
//!
//! Records (name, base model, type, format, path, tags and format-specific
//! fields) are kept in a single YAML document keyed by caller-supplied
//! identifiers. The document carries a format version which must match on
//! open, and is rewritten atomically on every change.
//!
//! # Example
//!
//! ```no_run
//! use gg_model_store::models::{
//!     BaseModelType, ModelConfig, ModelConfigStore, ModelFormat, ModelQuery, ModelType,
//!     YamlModelStore,
//! };
//!
//! let store = YamlModelStore::open("configs/models.yaml")?;
//! let lora = ModelConfig::new(
//!     "pixel-art",
//!     BaseModelType::StableDiffusionXL,
//!     ModelType::Lora,
//!     ModelFormat::Lycoris,
//!     "/models/pixel-art.safetensors",
//! )
//! .with_tags(["style"]);
//! store.add("pixel-art", lora.into())?;
//!
//! let sdxl = store.search_by_name(&ModelQuery::new().base_model(BaseModelType::StableDiffusionXL))?;
//! assert_eq!(sdxl.len(), 1);
//! # Ok::<(), gg_model_store::models::StoreError>(())
//! ```
//!
//! # Concurrency
//!
//! One store instance may be shared between threads; all access is serialized
//! by an in-process lock. Separate processes writing the same file are not
//! coordinated.

pub mod cli;
pub mod config;
pub mod models;
pub mod telemetry;
