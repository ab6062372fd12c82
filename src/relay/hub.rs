/// Connection hub - single-writer registry and broadcaster
///
/// The `Hub` owns the set of registered connections and is the only code that
/// touches it. Everything else holds a cloneable `HubHandle` and submits
/// events (register, unregister, broadcast, snapshot) over one bounded queue.
/// The hub task processes them strictly in arrival order, so membership
/// changes and broadcasts are totally ordered and no lock is needed.
///
/// Delivery to a peer is a non-blocking enqueue on that peer's bounded
/// outbound queue. A full queue disconnects the peer in the same loop turn;
/// one slow consumer never stalls the others.
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use crate::config::HubConfig;
use crate::errors::HubError;
use crate::logger::{self, LogTag};

use super::message::Message;
use super::metrics::{HubMetrics, HubMetricsSnapshot};

// ============================================================================
// HUB TYPES
// ============================================================================

/// Connection ID (unique per handle lineage, never reused)
pub type ConnectionId = u64;

/// Hub side of a peer's outbound queue
pub type PeerSender = mpsc::Sender<Message>;

/// Connection side of a peer's outbound queue
pub type PeerQueue = mpsc::Receiver<Message>;

enum HubEvent {
    Register {
        id: ConnectionId,
        sender: PeerSender,
    },
    Unregister {
        id: ConnectionId,
    },
    Broadcast {
        message: Message,
    },
    Snapshot {
        reply: oneshot::Sender<HubSnapshot>,
    },
}

/// Membership as seen by the hub at one point in its event order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubSnapshot {
    pub active_connections: usize,
    /// Sorted ascending
    pub connection_ids: Vec<ConnectionId>,
}

// ============================================================================
// HUB
// ============================================================================

pub struct Hub {
    /// Registered connections (connection_id → outbound queue)
    peers: HashMap<ConnectionId, PeerSender>,

    events: mpsc::Receiver<HubEvent>,

    metrics: Arc<HubMetrics>,
}

impl Hub {
    /// Create the hub and the handle used to reach it
    ///
    /// The hub does nothing until `run` is polled; `spawn` does both.
    pub fn new(config: &HubConfig) -> (Hub, HubHandle) {
        let (events_tx, events_rx) = mpsc::channel(config.event_queue_capacity.max(1));
        let metrics = HubMetrics::new();

        let hub = Hub {
            peers: HashMap::new(),
            events: events_rx,
            metrics: metrics.clone(),
        };
        let handle = HubHandle {
            events: events_tx,
            next_id: Arc::new(AtomicU64::new(1)),
            peer_queue_capacity: config.peer_queue_capacity.max(1),
            metrics,
        };

        (hub, handle)
    }

    /// Start the event loop on the tokio runtime
    pub fn spawn(config: &HubConfig) -> HubHandle {
        let (hub, handle) = Hub::new(config);
        tokio::spawn(hub.run());
        handle
    }

    /// Event loop; returns once every handle has been dropped
    pub async fn run(mut self) {
        logger::debug(LogTag::Hub, "Hub event loop started");

        while let Some(event) = self.events.recv().await {
            match event {
                HubEvent::Register { id, sender } => self.register(id, sender),
                HubEvent::Unregister { id } => self.unregister(id),
                HubEvent::Broadcast { message } => self.broadcast(message),
                HubEvent::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
            }
        }

        logger::debug(LogTag::Hub, "Hub event loop stopped (all handles dropped)");
    }

    fn register(&mut self, id: ConnectionId, sender: PeerSender) {
        if self.peers.contains_key(&id) {
            logger::warning(
                LogTag::Hub,
                &format!("Connection {} is already registered, ignoring", id),
            );
            return;
        }

        // Fresh queue: only a dropped receiver can make this fail
        if let Err(e) = sender.try_send(Message::connected()) {
            logger::debug(
                LogTag::Hub,
                &format!("Connection {} went away before confirmation: {}", id, e),
            );
            return;
        }

        self.peers.insert(id, sender);
        self.metrics.connection_opened();

        logger::info(
            LogTag::Hub,
            &format!("Client {} connected (active={})", id, self.peers.len()),
        );
    }

    fn unregister(&mut self, id: ConnectionId) {
        // Dropping the sender closes the peer's queue
        if self.peers.remove(&id).is_none() {
            logger::debug(
                LogTag::Hub,
                &format!("Connection {} already unregistered", id),
            );
            return;
        }

        self.metrics.connection_closed();
        logger::info(
            LogTag::Hub,
            &format!("Client {} disconnected (active={})", id, self.peers.len()),
        );
    }

    fn broadcast(&mut self, message: Message) {
        self.metrics.broadcast_processed();

        let metrics = &self.metrics;
        let mut overflowed = Vec::new();
        let mut gone = Vec::new();

        self.peers
            .retain(|id, sender| match sender.try_send(message.clone()) {
                Ok(()) => {
                    metrics.message_delivered();
                    true
                }
                Err(TrySendError::Full(_)) => {
                    overflowed.push(HubError::QueueOverflow { connection: *id });
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    gone.push(*id);
                    false
                }
            });

        for error in &overflowed {
            self.metrics.overflow_disconnect();
            self.metrics.connection_closed();
            logger::warning(
                LogTag::Hub,
                &format!("Disconnecting slow client: {}", error),
            );
        }
        for id in &gone {
            self.metrics.connection_closed();
            logger::debug(
                LogTag::Hub,
                &format!("Connection {} queue closed, removing", id),
            );
        }

        logger::debug(
            LogTag::Hub,
            &format!(
                "Broadcast {} (delivered={}, dropped={})",
                message.kind(),
                self.peers.len(),
                overflowed.len() + gone.len()
            ),
        );
    }

    fn snapshot(&self) -> HubSnapshot {
        let mut connection_ids: Vec<ConnectionId> = self.peers.keys().copied().collect();
        connection_ids.sort_unstable();
        HubSnapshot {
            active_connections: connection_ids.len(),
            connection_ids,
        }
    }
}

// ============================================================================
// HUB HANDLE
// ============================================================================

/// Cloneable entry point to a running hub
#[derive(Clone)]
pub struct HubHandle {
    events: mpsc::Sender<HubEvent>,
    next_id: Arc<AtomicU64>,
    peer_queue_capacity: usize,
    metrics: Arc<HubMetrics>,
}

impl HubHandle {
    /// Allocate an ID for a new connection
    pub fn next_connection_id(&self) -> ConnectionId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Create a bounded outbound queue sized for this hub
    pub fn peer_queue(&self) -> (PeerSender, PeerQueue) {
        mpsc::channel(self.peer_queue_capacity)
    }

    /// Add a connection; it receives one Connected message on its own queue
    ///
    /// The hub must hold the only `PeerSender` so that unregistering closes
    /// the queue.
    pub async fn register(&self, id: ConnectionId, sender: PeerSender) -> Result<(), HubError> {
        self.submit(HubEvent::Register { id, sender }).await
    }

    /// Remove a connection and close its queue; a no-op for non-members
    pub async fn unregister(&self, id: ConnectionId) -> Result<(), HubError> {
        self.submit(HubEvent::Unregister { id }).await
    }

    /// Fan `message` out to every registered connection, sender included
    pub async fn broadcast(&self, message: Message) -> Result<(), HubError> {
        self.submit(HubEvent::Broadcast { message }).await
    }

    /// Current membership, ordered after every event submitted before it
    pub async fn snapshot(&self) -> Result<HubSnapshot, HubError> {
        let (reply, response) = oneshot::channel();
        self.submit(HubEvent::Snapshot { reply }).await?;
        response.await.map_err(|_| HubError::Closed)
    }

    pub fn metrics(&self) -> HubMetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn submit(&self, event: HubEvent) -> Result<(), HubError> {
        self.events.send(event).await.map_err(|_| HubError::Closed)
    }
}
