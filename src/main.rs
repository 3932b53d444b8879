//! gg-model-store entry point.
//!
//! Loads settings, initializes logging, opens the model config document and
//! dispatches to a subcommand.
//!
//! ## CLI Subcommands
//!
//! - `gg-model-store models list|get|add|update|delete`
//! - `gg-model-store search tag|name|path`
//! - `gg-model-store config show|defaults|validate`
//! - `gg-model-store version`

use std::path::Path;
use std::process::ExitCode;

use gg_model_store::cli::{
    self, config_cmd, flag_value, has_flag, models_cmd, positionals, search_cmd, EXIT_USAGE,
};
use gg_model_store::config as store_config;
use gg_model_store::models::{ModelConfigStore, CONFIG_FILE_VERSION};
use gg_model_store::telemetry::init_logging;

/// Flags that take a value.
const VALUED_FLAGS: &[&str] = &["--key", "--name", "--base", "--type", "--store"];

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");
    let rest = if args.len() > 2 { &args[2..] } else { &[][..] };

    let code = match command {
        "help" | "--help" | "-h" => {
            match rest.first() {
                Some(subcommand) => print_command_help(subcommand),
                None => print_usage(),
            }
            0
        }
        "version" | "--version" | "-V" => {
            println!("gg-model-store {}", env!("CARGO_PKG_VERSION"));
            println!("config file version {}", CONFIG_FILE_VERSION);
            0
        }
        "config" => match rest.first().map(|s| s.as_str()).unwrap_or("show") {
            "show" => config_cmd::run_show(),
            "defaults" => config_cmd::run_defaults(),
            "validate" => config_cmd::run_validate(),
            other => {
                eprintln!("Unknown config subcommand: {}", other);
                print_command_help("config");
                EXIT_USAGE
            }
        },
        "models" | "search" => run_store_command(command, rest),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            EXIT_USAGE
        }
    };

    ExitCode::from(code as u8)
}

/// Commands that need an open store.
fn run_store_command(command: &str, rest: &[String]) -> i32 {
    let mut settings = match store_config::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_USAGE;
        }
    };
    if let Some(path) = flag_value(rest, "--store") {
        settings.config_path = path.into();
    }
    if let Err(e) = init_logging(&settings.logging) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let store = match cli::open_store(&settings.config_path) {
        Ok(store) => store,
        Err(code) => return code,
    };
    let json = has_flag(rest, "--json");
    let pos = positionals(rest, VALUED_FLAGS);

    match (command, pos.as_slice()) {
        ("models", [] | ["list"]) => models_cmd::run_list(&store, json),
        ("models", ["get", key]) => models_cmd::run_get(&store, key, json),
        ("models", ["add", file]) => {
            models_cmd::run_add(&store, Path::new(file), flag_value(rest, "--key"))
        }
        ("models", ["update", key, file]) => models_cmd::run_update(&store, key, Path::new(file)),
        ("models", ["delete", key]) => models_cmd::run_delete(&store, key),
        ("search", ["tag", tags]) => search_cmd::run_tag(&store, tags, json),
        ("search", ["name"]) => search_cmd::run_name(
            &store,
            flag_value(rest, "--name"),
            flag_value(rest, "--base"),
            flag_value(rest, "--type"),
            json,
        ),
        ("search", ["path", path]) => search_cmd::run_path(&store, Path::new(path), json),
        _ => {
            eprintln!("Invalid arguments for '{}' (store version {})", command, store.version());
            print_command_help(command);
            EXIT_USAGE
        }
    }
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "gg-model-store - model configuration registry v{}

USAGE:
    gg-model-store [COMMAND] [OPTIONS]

COMMANDS:
    models       List, show, add, update and delete model records
    search       Search records by tag, name/base/type or path
    config       Inspect settings (show, defaults, validate)
    version      Show version information
    help         Show this help message

OPTIONS:
    --store PATH   Override the model config document path
    --json         Print records as JSON

EXAMPLES:
    gg-model-store models list
    gg-model-store models add lora.yaml --key pixel-art
    gg-model-store models update pixel-art lora.yaml
    gg-model-store search tag sfw,anime
    gg-model-store search name --base sdxl --type lora
    gg-model-store search path /models/pixel-art.safetensors

ENVIRONMENT:
    GG_STORE_SETTINGS     TOML settings file
    GG_STORE_CONFIG_PATH  Model config document (default: configs/models.yaml)
    GG_STORE_LOG_LEVEL    Log filter (default: info)
    GG_STORE_LOG_FORMAT   json or pretty (default: pretty)
    GG_STORE_LOG_FILE     Write logs to a file instead of stderr

EXIT CODES:
    0  Success
    1  Operation failed (unknown key, duplicate key, invalid record)
    2  Usage or configuration error",
        version
    );
}

/// Print detailed help for a specific command.
fn print_command_help(command: &str) {
    match command {
        "models" => {
            eprintln!(
                "gg-model-store models - Manage model records

USAGE:
    gg-model-store models list [--json]
    gg-model-store models get <KEY> [--json]
    gg-model-store models add <FILE.yaml> [--key KEY]
    gg-model-store models update <KEY> <FILE.yaml>
    gg-model-store models delete <KEY>

DESCRIPTION:
    FILE.yaml holds one record as a YAML mapping with at least name,
    base_model, model_type, model_format and path. When --key is omitted
    a random UUID is used. update replaces the whole record.
"
            );
        }
        "search" => {
            eprintln!(
                "gg-model-store search - Query model records

USAGE:
    gg-model-store search tag <TAG[,TAG...]> [--json]
    gg-model-store search name [--name N] [--base B] [--type T] [--json]
    gg-model-store search path <PATH> [--json]

DESCRIPTION:
    tag   returns records carrying every listed tag.
    name  returns records matching every given filter; no filters lists all.
    path  prints the record stored at PATH; exits 1 if there is none.
"
            );
        }
        "config" => {
            eprintln!(
                "gg-model-store config - Inspect settings

USAGE:
    gg-model-store config show       Effective settings
    gg-model-store config defaults   Built-in defaults
    gg-model-store config validate   Check settings and document version
"
            );
        }
        _ => print_usage(),
    }
}
