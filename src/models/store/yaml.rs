// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Model config store backed by a single YAML document.
//!
//! The whole document is held in memory behind a reentrant lock and rewritten
//! in full on every mutation. Writes go to a temporary file in the same
//! directory which is then renamed over the target, so readers only ever see
//! a complete document.

use parking_lot::ReentrantMutex;
use serde_yaml::{Mapping, Value};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{ModelConfigStore, ModelQuery, StoreError, CONFIG_FILE_VERSION, METADATA_KEY};
use crate::models::config::{ConfigInput, ModelConfig};
use crate::models::factory::{ConfigError, ModelConfigFactory};

/// File-backed implementation of [`ModelConfigStore`].
pub struct YamlModelStore {
    filename: PathBuf,
    document: ReentrantMutex<RefCell<Mapping>>,
    version: String,
}

impl YamlModelStore {
    /// Open the document at `path`, creating it if it does not exist.
    ///
    /// Fails with [`StoreError::VersionMismatch`] if the document was written
    /// by an incompatible version.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let filename = absolute(path.as_ref())?;
        if !filename.exists() {
            initialize(&filename)?;
        }

        let text = fs::read_to_string(&filename)?;
        let document: Mapping = if text.trim().is_empty() {
            Mapping::new()
        } else {
            serde_yaml::from_str(&text)?
        };

        let version = read_version(&document);
        if version.as_deref() != Some(CONFIG_FILE_VERSION) {
            let found = version.unwrap_or_else(|| "<missing>".to_string());
            tracing::warn!(
                path = %filename.display(),
                expected = CONFIG_FILE_VERSION,
                found = %found,
                "model config file version mismatch"
            );
            return Err(StoreError::VersionMismatch {
                expected: CONFIG_FILE_VERSION.to_string(),
                found,
            });
        }

        tracing::info!(
            path = %filename.display(),
            records = document.len().saturating_sub(1),
            "model config store opened"
        );

        Ok(Self {
            filename,
            document: ReentrantMutex::new(RefCell::new(document)),
            version: CONFIG_FILE_VERSION.to_string(),
        })
    }

    /// Absolute path of the backing file.
    pub fn path(&self) -> &Path {
        &self.filename
    }

    /// Write `next` to disk, then make it the in-memory document.
    ///
    /// Memory is only replaced after the rename succeeds, so a failed write
    /// leaves both copies at the last committed state.
    fn commit(&self, next: Mapping) -> Result<(), StoreError> {
        let guard = self.document.lock();
        write_document(&self.filename, &next)?;
        *guard.borrow_mut() = next;
        tracing::debug!(path = %self.filename.display(), "model config document committed");
        Ok(())
    }

    /// Run `f` over every record in document order.
    fn scan<F>(&self, mut f: F) -> Result<(), StoreError>
    where
        F: FnMut(ModelConfig) -> bool,
    {
        let guard = self.document.lock();
        let document = guard.borrow();
        for (key, value) in document.iter() {
            let key = key
                .as_str()
                .ok_or_else(|| ConfigError::Malformed(format!("non-string key {:?}", key)))?;
            if key == METADATA_KEY {
                continue;
            }
            if !f(materialize(key, value)?) {
                break;
            }
        }
        Ok(())
    }
}

impl ModelConfigStore for YamlModelStore {
    fn version(&self) -> &str {
        &self.version
    }

    fn add(&self, key: &str, config: ConfigInput) -> Result<ModelConfig, StoreError> {
        let record = ModelConfigFactory::make_config(config, key)?;
        let fields = ModelConfigFactory::to_mapping(&record)?;
        {
            let guard = self.document.lock();
            let existing = guard.borrow().get(key).map(stored_name);
            if let Some(existing) = existing {
                tracing::warn!(key, name = %record.name, "duplicate model key");
                return Err(StoreError::DuplicateModel {
                    key: key.to_string(),
                    name: record.name,
                    existing,
                });
            }
            let mut next = guard.borrow().clone();
            next.insert(Value::from(key), Value::Mapping(fields));
            self.commit(next)?;
        }
        tracing::info!(key, name = %record.name, "model added");
        self.get(key)
    }

    fn update(&self, key: &str, config: ConfigInput) -> Result<ModelConfig, StoreError> {
        let record = ModelConfigFactory::make_config(config, key)?;
        let fields = ModelConfigFactory::to_mapping(&record)?;
        {
            let guard = self.document.lock();
            if !guard.borrow().contains_key(key) {
                tracing::warn!(key, "update of unknown model");
                return Err(StoreError::UnknownModel(key.to_string()));
            }
            let mut next = guard.borrow().clone();
            next.insert(Value::from(key), Value::Mapping(fields));
            self.commit(next)?;
        }
        tracing::info!(key, name = %record.name, "model updated");
        self.get(key)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let guard = self.document.lock();
        if !self.exists(key) {
            tracing::warn!(key, "delete of unknown model");
            return Err(StoreError::UnknownModel(key.to_string()));
        }
        let next: Mapping = guard
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != Some(key))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.commit(next)?;
        tracing::info!(key, "model deleted");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<ModelConfig, StoreError> {
        if key == METADATA_KEY {
            return Err(StoreError::UnknownModel(key.to_string()));
        }
        let guard = self.document.lock();
        let document = guard.borrow();
        match document.get(key) {
            Some(value) => materialize(key, value),
            None => Err(StoreError::UnknownModel(key.to_string())),
        }
    }

    fn exists(&self, key: &str) -> bool {
        if key == METADATA_KEY {
            return false;
        }
        let guard = self.document.lock();
        let found = guard.borrow().contains_key(key);
        found
    }

    fn all_models(&self) -> Result<Vec<ModelConfig>, StoreError> {
        let mut results = Vec::new();
        self.scan(|model| {
            results.push(model);
            true
        })?;
        Ok(results)
    }

    fn search_by_tag(&self, tags: &BTreeSet<String>) -> Result<Vec<ModelConfig>, StoreError> {
        let mut results = Vec::new();
        self.scan(|model| {
            if model.has_all_tags(tags) {
                results.push(model);
            }
            true
        })?;
        tracing::debug!(tags = ?tags, matches = results.len(), "search by tag");
        Ok(results)
    }

    fn search_by_name(&self, query: &ModelQuery) -> Result<Vec<ModelConfig>, StoreError> {
        let mut results = Vec::new();
        self.scan(|model| {
            if query.matches(&model) {
                results.push(model);
            }
            true
        })?;
        tracing::debug!(query = ?query, matches = results.len(), "search by name");
        Ok(results)
    }

    fn search_by_path(&self, path: &Path) -> Result<Option<ModelConfig>, StoreError> {
        let mut found = None;
        self.scan(|model| {
            // Exact match: `Path` equality would also accept `/a//b` or `/a/b/`.
            if model.path.as_os_str() == path.as_os_str() {
                found = Some(model);
                false
            } else {
                true
            }
        })?;
        Ok(found)
    }
}

impl std::fmt::Debug for YamlModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YamlModelStore")
            .field("filename", &self.filename)
            .field("version", &self.version)
            .finish()
    }
}

fn absolute(path: &Path) -> Result<PathBuf, StoreError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Create parent directories and write a document holding only metadata.
fn initialize(filename: &Path) -> Result<(), StoreError> {
    if let Some(parent) = filename.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut metadata = Mapping::new();
    metadata.insert("version".into(), CONFIG_FILE_VERSION.into());
    let mut document = Mapping::new();
    document.insert(METADATA_KEY.into(), Value::Mapping(metadata));
    write_document(filename, &document)?;
    tracing::info!(path = %filename.display(), "created model config file");
    Ok(())
}

/// Serialize `document` into a sibling temp file and rename it over `filename`.
fn write_document(filename: &Path, document: &Mapping) -> Result<(), StoreError> {
    let yaml = serde_yaml::to_string(document)?;
    let dir = match filename.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = format!(
        ".{}.",
        filename.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
    );

    let tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".new")
        .tempfile_in(dir)?;
    let (mut file, tmp_path) = tmp.into_parts();
    file.write_all(yaml.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    drop(file);

    tmp_path.persist(filename).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

fn read_version(document: &Mapping) -> Option<String> {
    match document.get(METADATA_KEY)?.get("version")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn stored_name(value: &Value) -> String {
    value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string()
}

fn materialize(key: &str, value: &Value) -> Result<ModelConfig, StoreError> {
    match value {
        Value::Mapping(fields) => Ok(ModelConfigFactory::make_config(fields.clone(), key)?),
        _ => Err(ConfigError::Malformed(format!("record '{}' is not a mapping", key)).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::taxonomy::{BaseModelType, ModelFormat, ModelType};
    use tempfile::TempDir;

    fn lora(name: &str) -> ModelConfig {
        ModelConfig::new(
            name,
            BaseModelType::StableDiffusionXL,
            ModelType::Lora,
            ModelFormat::Lycoris,
            format!("/models/{}.safetensors", name),
        )
    }

    #[test]
    fn test_open_creates_metadata_only_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/configs/models.yaml");
        let store = YamlModelStore::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(store.version(), CONFIG_FILE_VERSION);
        assert!(store.all_models().unwrap().is_empty());

        let doc: Mapping = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(read_version(&doc).as_deref(), Some(CONFIG_FILE_VERSION));
    }

    #[test]
    fn test_relative_path_is_made_absolute() {
        let store_path = absolute(Path::new("configs/models.yaml")).unwrap();
        assert!(store_path.is_absolute());
        assert!(store_path.ends_with("configs/models.yaml"));
    }

    #[test]
    fn test_commit_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = YamlModelStore::open(dir.path().join("models.yaml")).unwrap();
        store.add("a", lora("a").into()).unwrap();
        store.add("b", lora("b").into()).unwrap();
        store.delete("a").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["models.yaml".to_string()]);
    }

    #[test]
    fn test_enums_stored_as_plain_strings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models.yaml");
        let store = YamlModelStore::open(&path).unwrap();
        store.add("k", lora("style").into()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("base_model: sdxl"));
        assert!(text.contains("model_type: lora"));
        assert!(text.contains("model_format: lycoris"));
        assert!(!text.contains('!'), "no YAML tags expected: {}", text);
    }

    #[test]
    fn test_metadata_key_is_not_a_record() {
        let dir = TempDir::new().unwrap();
        let store = YamlModelStore::open(dir.path().join("models.yaml")).unwrap();
        assert!(!store.exists(METADATA_KEY));
        assert!(store.get(METADATA_KEY).unwrap_err().is_not_found());
        assert!(store.delete(METADATA_KEY).unwrap_err().is_not_found());
        assert!(matches!(
            store.add(METADATA_KEY, lora("x").into()),
            Err(StoreError::InvalidConfig(ConfigError::InvalidKey(_)))
        ));
    }

    /// Replace the target with a non-empty directory so the rename fails.
    fn block(path: &Path) -> String {
        let before = fs::read_to_string(path).unwrap();
        fs::remove_file(path).unwrap();
        fs::create_dir(path).unwrap();
        fs::write(path.join("blocker"), b"x").unwrap();
        before
    }

    fn unblock(path: &Path, before: &str) {
        fs::remove_dir_all(path).unwrap();
        fs::write(path, before).unwrap();
    }

    #[test]
    fn test_failed_commit_keeps_memory_and_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models.yaml");
        let store = YamlModelStore::open(&path).unwrap();
        store.add("a", lora("a").into()).unwrap();

        let before = block(&path);
        assert!(matches!(
            store.add("b", lora("b").into()),
            Err(StoreError::Io(_))
        ));
        assert!(!store.exists("b"));
        assert!(store.exists("a"));

        unblock(&path, &before);
        let reopened = YamlModelStore::open(&path).unwrap();
        assert!(!reopened.exists("b"));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_failed_update_keeps_memory_and_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models.yaml");
        let store = YamlModelStore::open(&path).unwrap();
        store.add("a", lora("old").into()).unwrap();

        let before = block(&path);
        assert!(matches!(
            store.update("a", lora("new").into()),
            Err(StoreError::Io(_))
        ));
        assert_eq!(store.get("a").unwrap().name, "old");

        unblock(&path, &before);
        let reopened = YamlModelStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap().name, "old");
    }

    #[test]
    fn test_failed_delete_keeps_memory_and_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models.yaml");
        let store = YamlModelStore::open(&path).unwrap();
        store.add("a", lora("a").into()).unwrap();

        let before = block(&path);
        assert!(matches!(store.delete("a"), Err(StoreError::Io(_))));
        assert!(store.exists("a"));
        assert_eq!(store.get("a").unwrap().name, "a");

        unblock(&path, &before);
        let reopened = YamlModelStore::open(&path).unwrap();
        assert!(reopened.exists("a"));
    }
}
