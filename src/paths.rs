//! Centralized path resolution for cliprelay
//!
//! All file and directory paths are resolved through this module using the
//! platform application data location:
//! - **macOS**: `~/Library/Application Support/cliprelay/`
//! - **Windows**: `%LOCALAPPDATA%\cliprelay\`
//! - **Linux**: `$XDG_DATA_HOME/cliprelay/` (fallback `~/.local/share/cliprelay/`)
//!
//! ```text
//! cliprelay/
//! ├── data/
//! │   └── config.toml
//! └── logs/
//!     └── cliprelay_*.log
//! ```

use once_cell::sync::Lazy;
use std::path::PathBuf;

const APP_DIR: &str = "cliprelay";

static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

fn resolve_base_directory() -> PathBuf {
    if let Some(dir) = dirs::data_local_dir() {
        return dir.join(APP_DIR);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(APP_DIR);
    }

    PathBuf::from(APP_DIR)
}

/// Root directory for all cliprelay data
pub fn get_base_directory() -> PathBuf {
    BASE_DIRECTORY.clone()
}

pub fn get_data_directory() -> PathBuf {
    BASE_DIRECTORY.join("data")
}

pub fn get_logs_directory() -> PathBuf {
    BASE_DIRECTORY.join("logs")
}

/// Default configuration file path (overridable with `--config <path>`)
pub fn get_config_path() -> PathBuf {
    get_data_directory().join("config.toml")
}

/// Create the data and logs directories if missing
pub fn ensure_all_directories() -> Result<(), String> {
    for (name, dir) in [("data", get_data_directory()), ("logs", get_logs_directory())] {
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                format!(
                    "Failed to create {} directory at {}: {}",
                    name,
                    dir.display(),
                    e
                )
            })?;
        }
    }

    Ok(())
}
