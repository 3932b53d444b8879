//! Fuzz target for model config validation.
//!
//! Arbitrary bytes parsed as YAML and fed to the factory must only ever
//! produce Ok or Err, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use gg_model_store::models::ModelConfigFactory;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(raw) = serde_yaml::from_str::<serde_yaml::Mapping>(text) {
        if let Ok(record) = ModelConfigFactory::make_config(raw, "fuzz") {
            let _ = ModelConfigFactory::to_mapping(&record);
        }
    }
});
