//! Structured logging for cliprelay
//!
//! A small leveled logger with per-component debug gating:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-tag debug output via `--debug-<tag>` flags (`--debug-hub`, `--debug-connection`, ...)
//! - Colored console output plus an optional append-only log file
//!
//! ## Usage
//!
//! ```rust
//! use cliprelay::logger::{self, LogTag};
//!
//! logger::info(LogTag::Hub, "Client connected (active=2)");
//! logger::warning(LogTag::Connection, "Dropping malformed frame");
//! logger::debug(LogTag::Hub, "Broadcast fan-out details"); // Only with --debug-hub
//! ```
//!
//! ## Initialization
//!
//! Call once at startup, before services are spawned:
//! ```rust,no_run
//! cliprelay::logger::init();
//! ```

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{
    get_logger_config, init_from_args, set_logger_config, update_logger_config, LoggerConfig,
};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// Reads the debug/verbosity flags from the command line and opens the log
/// file unless `--no-log-file` was given or `logging.file_logging` is off in
/// the loaded configuration. Logging before `init` still works, it just uses
/// the default configuration and writes to the console only.
pub fn init() {
    config::init_from_args();
    if !crate::config::with_config(|cfg| cfg.logging.file_logging) {
        update_logger_config(|logger_config| logger_config.file_logging = false);
    }
    file::init_file_logging();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
///
/// Shown by default, hidden only when the minimum level is raised above it.
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level
///
/// Only shown when `--debug-<tag>` is present for this tag.
///
/// # Example
/// ```rust
/// // Only shown with --debug-connection
/// cliprelay::logger::debug(cliprelay::logger::LogTag::Connection, "frame received");
/// ```
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (only with --verbose or --verbose-<tag>)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush pending log file writes
///
/// Call during shutdown.
pub fn flush() {
    file::flush_file_logging();
}
