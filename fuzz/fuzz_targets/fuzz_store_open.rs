//! Fuzz target for opening arbitrary documents.
//!
//! Whatever is on disk, opening and listing the store must not panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use gg_model_store::models::{ModelConfigStore, YamlModelStore};

fuzz_target!(|data: &[u8]| {
    let Ok(dir) = tempfile::TempDir::new() else {
        return;
    };
    let path = dir.path().join("models.yaml");
    if std::fs::write(&path, data).is_err() {
        return;
    }
    if let Ok(store) = YamlModelStore::open(&path) {
        let _ = store.all_models();
    }
});
