/// Log tags identifying the component that produced a log line
///
/// The debug key (lowercase) is what `--debug-<key>` matches against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Hub,
    Connection,
    Client,
    Webserver,
    Other(String),
}

impl LogTag {
    /// Key used by `--debug-<key>` / `--verbose-<key>` flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Hub => "hub".to_string(),
            LogTag::Connection => "connection".to_string(),
            LogTag::Client => "client".to_string(),
            LogTag::Webserver => "webserver".to_string(),
            LogTag::Other(name) => name.to_lowercase(),
        }
    }

    /// Uncolored label used in the log file
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Config => "CONFIG".to_string(),
            LogTag::Hub => "HUB".to_string(),
            LogTag::Connection => "CONN".to_string(),
            LogTag::Client => "CLIENT".to_string(),
            LogTag::Webserver => "WEBSERVER".to_string(),
            LogTag::Other(name) => name.to_uppercase(),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_keys() {
        assert_eq!(LogTag::Hub.to_debug_key(), "hub");
        assert_eq!(LogTag::Connection.to_debug_key(), "connection");
        assert_eq!(LogTag::Other("Tray".to_string()).to_debug_key(), "tray");
    }

    #[test]
    fn test_plain_labels() {
        assert_eq!(LogTag::Connection.to_plain_string(), "CONN");
        assert_eq!(LogTag::Other("tray".to_string()).to_string(), "TRAY");
    }
}
