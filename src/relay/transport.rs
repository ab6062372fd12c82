/// Transport seam between the pump loops and a concrete socket
///
/// A transport is split into a read half and a write half, each owned by
/// exactly one pump loop. The relay implements these for axum WebSockets
/// (server side, see `webserver::routes::ws`) and for tokio-tungstenite
/// streams (client side, below).
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::errors::TransportError;

/// Read half of a peer transport
#[async_trait]
pub trait FrameReader: Send + 'static {
    /// Wait for the next data frame
    ///
    /// Control frames are handled internally. A peer-initiated close is
    /// reported as `TransportError::Closed`.
    async fn read_frame(&mut self) -> Result<Vec<u8>, TransportError>;
}

/// Write half of a peer transport
#[async_trait]
pub trait FrameWriter: Send + 'static {
    async fn write_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Send a close frame
    async fn close(&mut self) -> Result<(), TransportError>;
}

// ============================================================================
// TOKIO-TUNGSTENITE (client side)
// ============================================================================

pub type ClientStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub type ClientReader = SplitStream<ClientStream>;
pub type ClientWriter = SplitSink<ClientStream, WsMessage>;

/// Dial a relay WebSocket endpoint and split it into pump halves
pub async fn connect(url: &str) -> Result<(ClientReader, ClientWriter), TransportError> {
    let (stream, _) = connect_async(url)
        .await
        .map_err(|e| TransportError::Connect {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    let (writer, reader) = stream.split();
    Ok((reader, writer))
}

#[async_trait]
impl FrameReader for ClientReader {
    async fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        loop {
            match self.next().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(text.into_bytes()),
                Some(Ok(WsMessage::Binary(data))) => return Ok(data),
                Some(Ok(WsMessage::Close(_))) | None => return Err(TransportError::Closed),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(TransportError::Io(e.to_string())),
            }
        }
    }
}

#[async_trait]
impl FrameWriter for ClientWriter {
    async fn write_text(&mut self, text: String) -> Result<(), TransportError> {
        self.send(WsMessage::Text(text))
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.send(WsMessage::Close(None))
            .await
            .map_err(|e| TransportError::Io(e.to_string()))
    }
}

// ============================================================================
// IN-MEMORY TRANSPORT (tests)
// ============================================================================
