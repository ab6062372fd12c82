/// Centralized argument handling for cliprelay binaries
///
/// Arguments are stored once in a process-wide list so the logger, the config
/// loader and the binaries all read the same view.
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Value of the argument following `flag`, if any
pub fn get_arg_value(flag: &str) -> Option<String> {
    value_after(&get_cmd_args(), flag)
}

fn value_after(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .filter(|v| !v.starts_with("--"))
        .cloned()
}

/// Config file path: `--config <path>` or the default data-dir location
pub fn get_config_path() -> PathBuf {
    get_arg_value("--config")
        .map(PathBuf::from)
        .unwrap_or_else(crate::paths::get_config_path)
}

/// Debug modes enabled on the command line (`--debug-<tag>`)
pub fn get_enabled_debug_modes() -> Vec<String> {
    get_cmd_args()
        .iter()
        .filter_map(|a| a.strip_prefix("--debug-").map(|s| s.to_string()))
        .collect()
}

pub fn print_help() {
    println!("cliprelay - shared clipboard text relay");
    println!();
    println!("USAGE:");
    println!("    cliprelay [FLAGS]");
    println!("    cliprelay_watch [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --config <path>           Config file (default: {})", crate::paths::get_config_path().display());
    println!("    --host <addr>             Relay bind address (overrides webserver.host)");
    println!("    --port <port>             Relay port (overrides webserver.port)");
    println!("    --url <ws-url>            Relay URL for clients (overrides client.server_url)");
    println!("    --help, -h                Show this help message");
    println!();
    println!("LOGGING FLAGS:");
    println!("    --debug-hub               Hub event loop debug output");
    println!("    --debug-connection        Per-connection pump debug output");
    println!("    --debug-client            Client session debug output");
    println!("    --debug-webserver         HTTP endpoints debug output");
    println!("    --debug-config            Configuration loading debug output");
    println!("    --debug-all               Every debug output");
    println!("    --verbose                 Very detailed tracing");
    println!("    --quiet, -q               Only warnings and errors");
    println!("    --log-tags <a,b>          Only show these tags");
    println!("    --no-log-file             Do not write the log file");
}

/// Print the active debug modes (only when any are enabled)
pub fn print_debug_info() {
    let enabled_modes = get_enabled_debug_modes();
    if !enabled_modes.is_empty() {
        println!("Command-line arguments: {:?}", get_cmd_args());
        println!("Enabled debug modes: {:?}", enabled_modes);
    }
}

/// Common argument parsing patterns used across binaries
pub mod patterns {
    use super::*;

    /// Checks for help flags
    pub fn is_help_requested() -> bool {
        has_arg("--help") || has_arg("-h")
    }

    /// `--port <n>` override
    pub fn get_port() -> Option<u16> {
        get_arg_value("--port").and_then(|s| s.parse().ok())
    }

    /// `--host <addr>` override
    pub fn get_host() -> Option<String> {
        get_arg_value("--host")
    }

    /// `--url <ws-url>` override
    pub fn get_server_url() -> Option<String> {
        get_arg_value("--url")
    }
}
