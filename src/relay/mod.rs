/// Clipboard relay core
///
/// Architecture:
/// - `message`: wire schema and JSON codec
/// - `hub`: single-writer registry; fans every broadcast out to all peers
/// - `connection`: read/write pumps binding one transport to the hub
/// - `transport`: split read/write traits implemented per socket library
/// - `metrics`: counters for the status endpoint and close-time logs
pub mod connection;
pub mod hub;
pub mod message;
pub mod metrics;
pub mod transport;

pub use connection::serve_connection;
pub use hub::{ConnectionId, Hub, HubHandle, HubSnapshot};
pub use message::{Message, MessageKind};
pub use metrics::{ConnectionMetricsSnapshot, HubMetricsSnapshot};
pub use transport::{FrameReader, FrameWriter};
