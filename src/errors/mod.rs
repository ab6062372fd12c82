/// Error types for cliprelay
///
/// Three failure classes stay contained to a single peer:
/// - `TransportError`: the peer's channel is gone; triggers unregister and teardown
/// - `DecodeError`: one malformed payload; the message is dropped, the connection stays
/// - `HubError::QueueOverflow`: the peer cannot keep up; it is disconnected
///
/// `RelayError` is the umbrella type returned by the binaries and the client.
use thiserror::Error;

use crate::relay::hub::ConnectionId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection closed by peer")] Closed,

    #[error("transport failure: {0}")] Io(String),

    #[error("failed to connect to {url}: {reason}")] Connect {
        url: String,
        reason: String,
    },
}

/// Malformed inbound payload
#[derive(Error, Debug)]
#[error("malformed message: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error("outbound queue of connection {connection} is full")] QueueOverflow {
        connection: ConnectionId,
    },

    #[error("hub event loop is not running")] Closed,
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Transport error: {0}")] Transport(#[from] TransportError),

    #[error("Decode error: {0}")] Decode(#[from] DecodeError),

    #[error("Hub error: {0}")] Hub(#[from] HubError),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Failed to bind {addr}: {reason}")] Bind {
        addr: String,
        reason: String,
    },

    #[error("Gave up reconnecting after {attempts} attempts")] ReconnectExhausted {
        attempts: u32,
    },

    #[error("IO error: {0}")] Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_umbrella_wraps_component_errors() {
        let err = RelayError::from(TransportError::Closed);
        assert!(matches!(err, RelayError::Transport(TransportError::Closed)));
        assert_eq!(err.to_string(), "Transport error: connection closed by peer");

        let err = RelayError::from(HubError::Closed);
        assert_eq!(err.to_string(), "Hub error: hub event loop is not running");
    }

    #[test]
    fn test_exhaustion_message_counts_attempts() {
        let err = RelayError::ReconnectExhausted { attempts: 3 };
        assert_eq!(err.to_string(), "Gave up reconnecting after 3 attempts");
    }

    #[test]
    fn test_overflow_message_names_connection() {
        let err = HubError::QueueOverflow { connection: 7 };
        assert_eq!(err.to_string(), "outbound queue of connection 7 is full");
    }
}
