// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Models CLI subcommands: list, get, add, update, delete.

use serde_yaml::Mapping;
use std::path::Path;

use super::{EXIT_FAILURE, EXIT_OK, EXIT_USAGE};
use crate::models::{ModelConfig, ModelConfigStore};

/// Run `models list`.
pub fn run_list(store: &dyn ModelConfigStore, json: bool) -> i32 {
    match store.all_models() {
        Ok(models) => {
            emit(&models, json);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error listing models: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Run `models get <key>`.
pub fn run_get(store: &dyn ModelConfigStore, key: &str, json: bool) -> i32 {
    match store.get(key) {
        Ok(model) => {
            print_record(&model, json);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Run `models add <file> [--key KEY]`. A fresh UUID is used when no key is given.
pub fn run_add(store: &dyn ModelConfigStore, file: &Path, key: Option<&str>) -> i32 {
    let raw = match read_record_file(file) {
        Ok(raw) => raw,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return EXIT_USAGE;
        }
    };
    let key = key
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    match store.add(&key, raw.into()) {
        Ok(model) => {
            println!("Added '{}' with key {}", model.name, model.key);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Run `models update <key> <file>`.
pub fn run_update(store: &dyn ModelConfigStore, key: &str, file: &Path) -> i32 {
    let raw = match read_record_file(file) {
        Ok(raw) => raw,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return EXIT_USAGE;
        }
    };
    match store.update(key, raw.into()) {
        Ok(model) => {
            println!("Updated '{}' ({})", model.name, model.key);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Run `models delete <key>`.
pub fn run_delete(store: &dyn ModelConfigStore, key: &str) -> i32 {
    match store.delete(key) {
        Ok(()) => {
            println!("Deleted {}", key);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Read a YAML mapping describing one model.
pub fn read_record_file(path: &Path) -> Result<Mapping, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    serde_yaml::from_str(&text).map_err(|e| format!("{} is not a YAML mapping: {}", path.display(), e))
}

/// Print a list of records as a table or JSON array.
pub fn emit(models: &[ModelConfig], json: bool) {
    if json {
        match serde_json::to_string_pretty(models) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error encoding JSON: {}", e),
        }
    } else {
        print_models(models);
    }
}

/// Print one record as YAML or JSON.
pub fn print_record(model: &ModelConfig, json: bool) {
    let encoded = if json {
        serde_json::to_string_pretty(model).map_err(|e| e.to_string())
    } else {
        serde_yaml::to_string(model).map_err(|e| e.to_string())
    };
    match encoded {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => eprintln!("Error encoding record: {}", e),
    }
}

/// Format and print records as a table to stdout.
pub fn print_models(models: &[ModelConfig]) {
    if models.is_empty() {
        println!("No models found.");
        return;
    }

    println!(
        "{:<38} {:<30} {:<13} {:<12} {:<17} PATH",
        "KEY", "NAME", "BASE", "TYPE", "FORMAT"
    );
    println!("{}", "-".repeat(120));

    for m in models {
        println!(
            "{:<38} {:<30} {:<13} {:<12} {:<17} {}",
            truncate(&m.key, 37),
            truncate(&m.name, 29),
            m.base_model,
            m.model_type,
            m.model_format,
            m.path.display(),
        );
    }

    println!("{}", "-".repeat(120));
    println!("{} model(s)", models.len());
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
