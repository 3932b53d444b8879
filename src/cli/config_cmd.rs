// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, defaults, validate.
//!
//! These commands read settings without opening the model store.

use super::{EXIT_FAILURE, EXIT_OK, EXIT_USAGE};
use crate::config::{self, StoreSettings, DEFAULT_CONFIG_PATH, DEFAULT_LOG_LEVEL};
use crate::models::{YamlModelStore, CONFIG_FILE_VERSION};
use crate::telemetry::LogFormat;

/// Print effective settings as key-value pairs to stdout.
pub fn run_show() -> i32 {
    match config::load() {
        Ok(settings) => {
            print_settings(&settings);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_USAGE
        }
    }
}

/// Print default settings (no file or env overrides) to stdout.
pub fn run_defaults() -> i32 {
    println!("GG_STORE_CONFIG_PATH={}", DEFAULT_CONFIG_PATH);
    println!("GG_STORE_LOG_LEVEL={}", DEFAULT_LOG_LEVEL);
    println!("GG_STORE_LOG_FORMAT=pretty");
    println!("GG_STORE_LOG_FILE=");
    println!("CONFIG_FILE_VERSION={}", CONFIG_FILE_VERSION);
    EXIT_OK
}

/// Validate settings and, if the document exists, its version.
///
/// Returns 0 if valid, 1 if the document is unusable, 2 if settings are bad.
pub fn run_validate() -> i32 {
    let settings = match config::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_USAGE;
        }
    };
    validate_settings(&settings)
}

/// Check an already-loaded settings value.
pub fn validate_settings(settings: &StoreSettings) -> i32 {
    if tracing_subscriber::EnvFilter::try_new(&settings.logging.level).is_err() {
        eprintln!("WARNING: GG_STORE_LOG_LEVEL '{}' is not a valid filter", settings.logging.level);
        return EXIT_USAGE;
    }

    if !settings.config_path.exists() {
        println!(
            "Settings are valid. {} does not exist yet and will be created on first use.",
            settings.config_path.display()
        );
        return EXIT_OK;
    }

    match YamlModelStore::open(&settings.config_path) {
        Ok(_) => {
            println!("Configuration is valid.");
            EXIT_OK
        }
        Err(e) => {
            eprintln!("WARNING: {}", e);
            EXIT_FAILURE
        }
    }
}

fn print_settings(settings: &StoreSettings) {
    let format = match settings.logging.format {
        LogFormat::Json => "json",
        LogFormat::Pretty => "pretty",
    };
    println!("GG_STORE_CONFIG_PATH={}", settings.config_path.display());
    println!("GG_STORE_LOG_LEVEL={}", settings.logging.level);
    println!("GG_STORE_LOG_FORMAT={}", format);
    println!(
        "GG_STORE_LOG_FILE={}",
        settings
            .logging
            .output_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    );
}
