/// Shared application state for the webserver
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use crate::relay::HubHandle;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    /// Entry point to the relay hub
    pub hub: HubHandle,

    /// Fired to stop the server gracefully
    pub shutdown: Arc<Notify>,

    /// Delay between answering POST /shutdown and firing `shutdown`
    pub shutdown_delay: Duration,

    /// Server startup time
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(hub: HubHandle, shutdown: Arc<Notify>, shutdown_delay: Duration) -> Self {
        Self {
            hub,
            shutdown,
            shutdown_delay,
            startup_time: chrono::Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        (chrono::Utc::now() - self.startup_time).num_seconds()
    }
}
