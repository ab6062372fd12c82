/// Core logging entry point with filtering
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Anything above the minimum level is dropped
/// 3. Debug requires `--debug-<tag>` for that tag
/// 4. Verbose requires `--verbose` or `--verbose-<tag>`
/// 5. A non-empty allow-list restricts the remaining levels to listed tags

use super::config::{get_logger_config, is_debug_enabled_for_tag, is_verbose_enabled_for_tag};
use super::levels::LogLevel;
use super::tags::LogTag;

pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    let config = get_logger_config();

    if level > config.min_level {
        return false;
    }

    if level == LogLevel::Debug {
        return is_debug_enabled_for_tag(tag);
    }

    if level == LogLevel::Verbose {
        return config.verbose_tags.is_empty() || is_verbose_enabled_for_tag(tag);
    }

    if !config.enabled_tags.is_empty() && !config.enabled_tags.contains(&tag.to_debug_key()) {
        return false;
    }

    true
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(tag, level.as_str(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_always_pass() {
        assert!(should_log(&LogTag::Hub, LogLevel::Error));
    }

    #[test]
    fn test_debug_is_gated_by_default() {
        assert!(!should_log(&LogTag::Hub, LogLevel::Debug));
        assert!(should_log(&LogTag::Hub, LogLevel::Info));
    }
}
