/// Configuration utilities - loading and access helpers
use super::schemas::Config;
use once_cell::sync::{Lazy, OnceCell};
use std::path::Path;
use std::sync::RwLock;

use crate::logger::{self, LogTag};

/// Global configuration instance
///
/// Set once by `load_config`/`load_config_from_path`. Readers that run before
/// loading (tests, library users) see the defaults.
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

static DEFAULT_CONFIG: Lazy<Config> = Lazy::new(Config::default);

/// Load configuration from the path chosen on the command line (or the default)
pub fn load_config() -> Result<(), String> {
    load_config_from_path(crate::arguments::get_config_path())
}

/// Load configuration from a specific TOML file
///
/// A missing file is not an error: defaults are used and a warning is logged.
pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> Result<(), String> {
    let path = path.as_ref();

    let config = if path.exists() {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;
        let config = parse_config(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;
        logger::debug(
            LogTag::Config,
            &format!("Loaded configuration from {}", path.display()),
        );
        config
    } else {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path.display()),
        );
        Config::default()
    };

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(())
}

/// Parse a TOML document into a `Config`; absent keys keep their defaults
pub fn parse_config(contents: &str) -> Result<Config, String> {
    toml::from_str::<Config>(contents).map_err(|e| e.to_string())
}

/// Read access to the configuration
///
/// # Example
/// ```
/// use cliprelay::config::with_config;
///
/// let port = with_config(|cfg| cfg.webserver.port);
/// assert!(port > 0);
/// ```
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    match CONFIG.get() {
        Some(lock) => match lock.read() {
            Ok(config) => f(&config),
            Err(poisoned) => f(&poisoned.into_inner()),
        },
        None => f(&DEFAULT_CONFIG),
    }
}

/// Clone of the entire configuration, for holding across await points
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.hub.peer_queue_capacity, 256);
        assert_eq!(config.webserver.port, 8948);
        assert_eq!(config.client.reconnect_interval_secs, 5);
        assert_eq!(config.client.max_reconnect_attempts, None);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [webserver]
            port = 9000

            [client]
            max_reconnect_attempts = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.webserver.port, 9000);
        assert_eq!(config.webserver.host, "0.0.0.0");
        assert_eq!(config.client.max_reconnect_attempts, Some(3));
        assert_eq!(config.client.server_url, "ws://localhost:8948/ws");
    }

    #[test]
    fn test_invalid_document_is_rejected() {
        assert!(parse_config("[hub]\npeer_queue_capacity = \"many\"").is_err());
    }

    #[test]
    fn test_config_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[hub]\nevent_queue_capacity = 32\n").unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let config = parse_config(&contents).unwrap();
        assert_eq!(config.hub.event_queue_capacity, 32);
        assert_eq!(config.hub.peer_queue_capacity, 256);

        let rendered = toml::to_string_pretty(&config).unwrap();
        assert_eq!(parse_config(&rendered).unwrap(), config);
    }
}
