/// Logger configuration derived from command-line flags
///
/// Recognized flags:
/// - `--debug-<tag>`     enable DEBUG output for one tag (`--debug-all` for every tag)
/// - `--verbose`         enable VERBOSE output everywhere
/// - `--verbose-<tag>`   enable VERBOSE output for one tag
/// - `--quiet`, `-q`     only warnings and errors
/// - `--log-tags a,b`    restrict INFO/WARNING output to the listed tags
/// - `--no-log-file`     console output only
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

use super::levels::LogLevel;
use super::tags::LogTag;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped
    pub min_level: LogLevel,
    /// Tags with DEBUG output enabled ("all" enables every tag)
    pub debug_tags: HashSet<String>,
    /// Tags with VERBOSE output enabled
    pub verbose_tags: HashSet<String>,
    /// Allow-list for INFO/WARNING output; empty means every tag
    pub enabled_tags: HashSet<String>,
    /// Persist log lines to the log file
    pub file_logging: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
            file_logging: true,
        }
    }
}

impl LoggerConfig {
    /// Build a configuration from raw command-line arguments
    pub fn from_args(args: &[String]) -> Self {
        let mut config = LoggerConfig::default();

        let mut iter = args.iter().peekable();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--verbose" => config.min_level = LogLevel::Verbose,
                "--quiet" | "-q" => config.min_level = LogLevel::Warning,
                "--no-log-file" => config.file_logging = false,
                "--log-tags" => {
                    if let Some(list) = iter.next() {
                        config.enabled_tags = list
                            .split(',')
                            .map(|t| t.trim().to_lowercase())
                            .filter(|t| !t.is_empty())
                            .collect();
                    }
                }
                other => {
                    if let Some(tag) = other.strip_prefix("--debug-") {
                        config.debug_tags.insert(tag.to_lowercase());
                        // Debug output for a tag needs the threshold to let DEBUG through
                        if config.min_level < LogLevel::Debug {
                            config.min_level = LogLevel::Debug;
                        }
                    } else if let Some(tag) = other.strip_prefix("--verbose-") {
                        config.verbose_tags.insert(tag.to_lowercase());
                        config.min_level = LogLevel::Verbose;
                    }
                }
            }
        }

        config
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Get a copy of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    match LOGGER_CONFIG.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Replace the logger configuration
pub fn set_logger_config(config: LoggerConfig) {
    match LOGGER_CONFIG.write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Mutate the logger configuration in place
pub fn update_logger_config<F: FnOnce(&mut LoggerConfig)>(f: F) {
    match LOGGER_CONFIG.write() {
        Ok(mut current) => f(&mut current),
        Err(poisoned) => f(&mut poisoned.into_inner()),
    }
}

/// Initialize the logger configuration from the process arguments
pub fn init_from_args() {
    let args = crate::arguments::get_cmd_args();
    set_logger_config(LoggerConfig::from_args(&args));
}

pub(super) fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = get_logger_config();
    config.debug_tags.contains("all") || config.debug_tags.contains(&tag.to_debug_key())
}

pub(super) fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config()
        .verbose_tags
        .contains(&tag.to_debug_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = LoggerConfig::from_args(&args(&["cliprelay"]));
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(config.debug_tags.is_empty());
        assert!(config.file_logging);
    }

    #[test]
    fn test_debug_flags_collect_tags() {
        let config =
            LoggerConfig::from_args(&args(&["cliprelay", "--debug-hub", "--debug-Connection"]));
        assert!(config.debug_tags.contains("hub"));
        assert!(config.debug_tags.contains("connection"));
        assert_eq!(config.min_level, LogLevel::Debug);
    }

    #[test]
    fn test_quiet_and_file_flags() {
        let config = LoggerConfig::from_args(&args(&["cliprelay", "-q", "--no-log-file"]));
        assert_eq!(config.min_level, LogLevel::Warning);
        assert!(!config.file_logging);
    }

    #[test]
    fn test_log_tags_allow_list() {
        let config = LoggerConfig::from_args(&args(&["cliprelay", "--log-tags", "hub, client"]));
        assert_eq!(config.enabled_tags.len(), 2);
        assert!(config.enabled_tags.contains("client"));
    }
}
