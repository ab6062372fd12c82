/// Configuration schemas - all config structures defined once with defaults
use crate::config_struct;

// ============================================================================
// WEBSERVER CONFIGURATION
// ============================================================================

config_struct! {
    /// Relay HTTP/WebSocket listener
    pub struct WebserverConfig {
        /// Bind address (all interfaces by default)
        host: String = "0.0.0.0".to_string(),
        port: u16 = 8948,
        /// Delay between answering POST /shutdown and stopping the server
        shutdown_delay_ms: u64 = 500,
    }
}

// ============================================================================
// HUB CONFIGURATION
// ============================================================================

config_struct! {
    /// Connection hub queues
    pub struct HubConfig {
        /// Outbound queue capacity per connection; a full queue disconnects the peer
        peer_queue_capacity: usize = 256,
        /// Capacity of the hub's own register/unregister/broadcast event queue
        event_queue_capacity: usize = 256,
    }
}

// ============================================================================
// CLIENT CONFIGURATION
// ============================================================================

config_struct! {
    /// Display client connection settings
    pub struct ClientConfig {
        server_url: String = "ws://localhost:8948/ws".to_string(),
        /// Fixed sleep before every reconnect attempt
        reconnect_interval_secs: u64 = 5,
        /// None retries forever
        max_reconnect_attempts: Option<u32> = None,
        /// Queue of user actions waiting to be sent
        outbound_queue_capacity: usize = 10,
    }
}

// ============================================================================
// LOGGING CONFIGURATION
// ============================================================================

config_struct! {
    pub struct LoggingConfig {
        file_logging: bool = true,
    }
}

// ============================================================================
// ROOT
// ============================================================================

config_struct! {
    /// Root configuration (one section per component)
    pub struct Config {
        webserver: WebserverConfig = WebserverConfig::default(),
        hub: HubConfig = HubConfig::default(),
        client: ClientConfig = ClientConfig::default(),
        logging: LoggingConfig = LoggingConfig::default(),
    }
}
