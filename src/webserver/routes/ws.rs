/// Relay WebSocket endpoint
///
/// Every upgraded socket becomes one hub connection. The axum socket is split
/// so the read and write pumps each own one half.
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};

use crate::errors::TransportError;
use crate::logger::{self, LogTag};
use crate::relay::{serve_connection, FrameReader, FrameWriter};
use crate::webserver::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ws", get(ws_handler))
}

/// Upgrade handler; origins are not checked
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (writer, reader) = socket.split();
    let id = serve_connection(state.hub.clone(), reader, writer).await;
    logger::debug(
        LogTag::Webserver,
        &format!("WebSocket for connection {} closed", id),
    );
}

#[async_trait]
impl FrameReader for SplitStream<WebSocket> {
    async fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        loop {
            match self.next().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(text.into_bytes()),
                Some(Ok(WsMessage::Binary(data))) => return Ok(data),
                Some(Ok(WsMessage::Close(_))) | None => return Err(TransportError::Closed),
                // Ping/pong are answered by the protocol layer
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(TransportError::Io(e.to_string())),
            }
        }
    }
}

#[async_trait]
impl FrameWriter for SplitSink<WebSocket, WsMessage> {
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
