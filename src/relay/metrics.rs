/// Relay metrics collection
///
/// Counters are written by the hub task and by the pump loops and read from
/// anywhere (status endpoint, close-time logging). They never gate behavior.
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// CONNECTION METRICS
// ============================================================================

/// Per-connection counters
#[derive(Debug, Default)]
pub struct ConnectionMetrics {
    /// Frames read from the transport
    frames_received: AtomicU64,

    /// Frames that failed to decode and were dropped
    decode_failures: AtomicU64,

    /// Messages written to the transport
    messages_written: AtomicU64,
}

impl ConnectionMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_decode_failures(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_written(&self) {
        self.messages_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ConnectionMetricsSnapshot {
        ConnectionMetricsSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            messages_written: self.messages_written.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionMetricsSnapshot {
    pub frames_received: u64,
    pub decode_failures: u64,
    pub messages_written: u64,
}

// ============================================================================
// HUB METRICS
// ============================================================================

/// Hub-level metrics (aggregate across all connections)
#[derive(Debug, Default)]
pub struct HubMetrics {
    /// Connections registered (lifetime)
    total_connections: AtomicU64,

    /// Currently registered connections
    active_connections: AtomicUsize,

    /// Broadcast events processed
    broadcasts: AtomicU64,

    /// Messages enqueued on peer queues
    messages_delivered: AtomicU64,

    /// Peers dropped because their queue was full
    overflow_disconnects: AtomicU64,
}

impl HubMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn connection_opened(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn broadcast_processed(&self) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn message_delivered(&self) {
        self.messages_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn overflow_disconnect(&self) {
        self.overflow_disconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HubMetricsSnapshot {
        HubMetricsSnapshot {
            total_connections: self.total_connections.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            messages_delivered: self.messages_delivered.load(Ordering::Relaxed),
            overflow_disconnects: self.overflow_disconnects.load(Ordering::Relaxed),
        }
    }
}

/// Hub metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubMetricsSnapshot {
    pub total_connections: u64,
    pub active_connections: usize,
    pub broadcasts: u64,
    pub messages_delivered: u64,
    pub overflow_disconnects: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_metrics() {
        let metrics = ConnectionMetrics::new();

        metrics.inc_received();
        metrics.inc_received();
        metrics.inc_decode_failures();
        metrics.inc_written();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames_received, 2);
        assert_eq!(snapshot.decode_failures, 1);
        assert_eq!(snapshot.messages_written, 1);
    }

    #[test]
    fn test_hub_metrics() {
        let metrics = HubMetrics::new();

        metrics.connection_opened();
        metrics.connection_opened();
        metrics.broadcast_processed();
        metrics.message_delivered();
        metrics.message_delivered();
        metrics.overflow_disconnect();
        metrics.connection_closed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_connections, 2);
        assert_eq!(snapshot.active_connections, 1);
        assert_eq!(snapshot.broadcasts, 1);
        assert_eq!(snapshot.messages_delivered, 2);
        assert_eq!(snapshot.overflow_disconnects, 1);
    }
}
