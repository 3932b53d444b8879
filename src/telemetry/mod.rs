//! Telemetry module for the model store.
//!
//! Provides structured logging setup. All output is file-based or stderr.

mod logging;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
