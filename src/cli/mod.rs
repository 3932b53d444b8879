// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI module for gg-model-store commands.
//!
//! Every subcommand returns a process exit code instead of panicking or
//! exiting directly, so commands can be exercised from tests.
//!
//! ## Usage
//!
//! ```bash
//! gg-model-store models list            # Table of every stored model
//! gg-model-store models add lora.yaml   # Add a record read from YAML
//! gg-model-store search tag sfw,anime   # Models carrying both tags
//! gg-model-store config show            # Effective settings
//! ```

pub mod config_cmd;
pub mod models_cmd;
pub mod search_cmd;

use crate::models::{StoreError, YamlModelStore};

/// Exit code for success.
pub const EXIT_OK: i32 = 0;
/// Exit code when the requested operation failed.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for bad arguments or unusable settings.
pub const EXIT_USAGE: i32 = 2;

/// Open the store at `path`, reporting failures on stderr.
pub fn open_store(path: &std::path::Path) -> Result<YamlModelStore, i32> {
    YamlModelStore::open(path).map_err(|e| {
        eprintln!("Error opening model store {}: {}", path.display(), e);
        if matches!(e, StoreError::VersionMismatch { .. }) {
            eprintln!("The file was written by an incompatible version; it was not modified.");
        }
        EXIT_USAGE
    })
}

/// Value following `flag` in `args`, if present.
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

/// Whether the bare `flag` appears in `args`.
pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor flag values.
///
/// `valued` lists the flags that consume the following argument.
pub fn positionals<'a>(args: &'a [String], valued: &[&str]) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
            continue;
        }
        if valued.contains(&arg.as_str()) {
            skip = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flag_value() {
        let a = args(&["add", "cfg.yaml", "--key", "k1", "--json"]);
        assert_eq!(flag_value(&a, "--key"), Some("k1"));
        assert_eq!(flag_value(&a, "--name"), None);
        assert!(has_flag(&a, "--json"));
    }

    #[test]
    fn test_flag_without_value() {
        let a = args(&["add", "--key"]);
        assert_eq!(flag_value(&a, "--key"), None);
    }

    #[test]
    fn test_positionals_skip_flags_and_values() {
        let a = args(&["name", "--base", "sd-1", "--json", "extra"]);
        assert_eq!(positionals(&a, &["--base"]), vec!["name", "extra"]);
    }

    #[test]
    fn test_open_store_version_mismatch_is_usage_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("models.yaml");
        std::fs::write(&path, "__metadata__:\n  version: 1.0.0\n").unwrap();
        assert_eq!(open_store(&path).unwrap_err(), EXIT_USAGE);
    }
}
