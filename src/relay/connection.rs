/// Per-peer connection pumps
///
/// Each peer runs two loops:
/// - read pump: transport → decode → hub broadcast (runs in the caller's task)
/// - write pump: outbound queue → encode → transport (spawned task)
///
/// Whichever loop ends first ends the connection. The hub is told to
/// unregister, which closes the outbound queue; the write pump then sends a
/// close frame and exits. A writer that cannot finish within
/// `WRITER_CLOSE_GRACE` is aborted, which drops the write half. Dropping both
/// halves releases the socket.
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{HubError, RelayError, TransportError};
use crate::logger::{self, LogTag};

use super::hub::{ConnectionId, HubHandle, PeerQueue};
use super::message::Message;
use super::metrics::ConnectionMetrics;
use super::transport::{FrameReader, FrameWriter};

/// How long the write pump gets to flush and send its close frame
pub const WRITER_CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Serve one peer until its transport fails or the hub drops it
///
/// Registers with the hub, runs both pumps and always unregisters before
/// returning. Returns the connection ID used for the peer.
pub async fn serve_connection<R, W>(hub: HubHandle, reader: R, writer: W) -> ConnectionId
where
    R: FrameReader,
    W: FrameWriter,
{
    let id = hub.next_connection_id();
    let (sender, queue) = hub.peer_queue();
    let metrics = ConnectionMetrics::new();

    if let Err(e) = hub.register(id, sender).await {
        logger::error(
            LogTag::Connection,
            &format!("Connection {} could not register: {}", id, e),
        );
        return id;
    }

    let mut write_task = tokio::spawn(write_pump(id, writer, queue, metrics.clone()));
    let mut writer_done = false;

    tokio::select! {
        reason = read_pump(id, reader, &hub, &metrics) => {
            match reason {
                RelayError::Transport(TransportError::Closed) => logger::debug(
                    LogTag::Connection,
                    &format!("Connection {} closed by peer", id),
                ),
                other => logger::warning(
                    LogTag::Connection,
                    &format!("Connection {} read loop ended: {}", id, other),
                ),
            }
        }
        result = &mut write_task => {
            writer_done = true;
            log_writer_exit(id, result);
        }
    }

    if let Err(e) = hub.unregister(id).await {
        logger::debug(
            LogTag::Connection,
            &format!("Connection {} unregister skipped: {}", id, e),
        );
    }

    // Unregister (or a stopped hub) closes the queue, so a healthy writer finishes
    if !writer_done {
        match tokio::time::timeout(WRITER_CLOSE_GRACE, &mut write_task).await {
            Ok(result) => log_writer_exit(id, result),
            Err(_) => {
                logger::warning(
                    LogTag::Connection,
                    &format!("Connection {} writer stalled, aborting", id),
                );
                write_task.abort();
            }
        }
    }

    let stats = metrics.snapshot();
    logger::debug(
        LogTag::Connection,
        &format!(
            "Connection {} finished (received={}, written={}, decode_failures={})",
            id, stats.frames_received, stats.messages_written, stats.decode_failures
        ),
    );

    id
}

/// Transport → hub; returns the reason the loop stopped
async fn read_pump<R: FrameReader>(
    id: ConnectionId,
    mut reader: R,
    hub: &HubHandle,
    metrics: &ConnectionMetrics,
) -> RelayError {
    loop {
        let frame = match reader.read_frame().await {
            Ok(frame) => frame,
            Err(e) => return RelayError::Transport(e),
        };
        metrics.inc_received();

        let message = match Message::decode(&frame) {
            Ok(message) => message,
            Err(e) => {
                metrics.inc_decode_failures();
                logger::warning(
                    LogTag::Connection,
                    &format!("Connection {} sent a malformed message: {}", id, e),
                );
                continue;
            }
        };

        logger::debug(
            LogTag::Connection,
            &format!(
                "Connection {} received {}: {}",
                id,
                message.kind(),
                message.content()
            ),
        );

        if let Err(HubError::Closed) = hub.broadcast(message).await {
            return RelayError::Hub(HubError::Closed);
        }
    }
}

/// Outbound queue → transport; sends a close frame once the queue closes
async fn write_pump<W: FrameWriter>(
    id: ConnectionId,
    mut writer: W,
    mut queue: PeerQueue,
    metrics: Arc<ConnectionMetrics>,
) -> Result<(), TransportError> {
    while let Some(message) = queue.recv().await {
        let text = message.encode();
        logger::verbose(
            LogTag::Connection,
            &format!("Connection {} <- {}", id, text),
        );
        writer.write_text(text).await?;
        metrics.inc_written();
    }

    logger::debug(
        LogTag::Connection,
        &format!("Connection {} queue closed, sending close frame", id),
    );
    // Peer may already be gone
    let _ = writer.close().await;
    Ok(())
}

fn log_writer_exit(
    id: ConnectionId,
    result: Result<Result<(), TransportError>, tokio::task::JoinError>,
) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => logger::warning(
            LogTag::Connection,
            &format!("Connection {} write failed: {}", id, e),
        ),
        Err(e) => logger::error(
            LogTag::Connection,
            &format!("Connection {} writer task panicked: {}", id, e),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HubConfig;
    use crate::relay::hub::Hub;
    use crate::relay::message::MessageKind;
    use crate::relay::transport::memory::{self, Frame, RemotePeer};
    use std::time::Duration;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn spawn_peer(hub: &HubHandle) -> (RemotePeer, JoinHandle<ConnectionId>) {
        let (reader, writer, peer) = memory::transport();
        let task = tokio::spawn(serve_connection(hub.clone(), reader, writer));
        (peer, task)
    }

    async fn next_message(peer: &mut RemotePeer) -> Message {
        match timeout(WAIT, peer.from_relay.recv()).await.unwrap() {
            Some(Frame::Text(text)) => Message::decode(text.as_bytes()).unwrap(),
            other => panic!("expected a text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_and_clear_reach_other_peer() {
        let hub = Hub::spawn(&HubConfig::default());
        let (mut a, _a_task) = spawn_peer(&hub);
        let (mut b, _b_task) = spawn_peer(&hub);
        assert_eq!(next_message(&mut a).await.kind(), MessageKind::Connected);
        assert_eq!(next_message(&mut b).await.kind(), MessageKind::Connected);

        a.send_text(&Message::update("hello").encode());
        let received = next_message(&mut b).await;
        assert_eq!(received.kind(), MessageKind::Update);
        assert_eq!(received.content(), "hello");

        // Sender gets its own broadcast back
        assert_eq!(next_message(&mut a).await.content(), "hello");

        a.send_text(&Message::clear().encode());
        assert_eq!(next_message(&mut b).await.kind(), MessageKind::Clear);
    }

    #[tokio::test]
    async fn test_malformed_frame_is_skipped() {
        let hub = Hub::spawn(&HubConfig::default());
        let (mut a, _a_task) = spawn_peer(&hub);
        let (mut b, _b_task) = spawn_peer(&hub);
        next_message(&mut a).await;
        next_message(&mut b).await;

        a.send_text("{not json");
        a.send_text(r#"{"type":"update","content":"after"}"#);

        assert_eq!(next_message(&mut b).await.content(), "after");
        assert_eq!(hub.snapshot().await.unwrap().active_connections, 2);
    }

    #[tokio::test]
    async fn test_peer_close_unregisters_and_sends_close_frame() {
        let hub = Hub::spawn(&HubConfig::default());
        let (reader, writer, peer) = memory::transport();
        let RemotePeer {
            to_relay,
            mut from_relay,
        } = peer;
        let task = tokio::spawn(serve_connection(hub.clone(), reader, writer));

        assert!(matches!(
            timeout(WAIT, from_relay.recv()).await.unwrap(),
            Some(Frame::Text(_))
        ));
        drop(to_relay);

        let id = timeout(WAIT, task).await.unwrap().unwrap();
        assert_eq!(from_relay.recv().await, Some(Frame::Close));

        let snapshot = hub.snapshot().await.unwrap();
        assert!(!snapshot.connection_ids.contains(&id));
        assert_eq!(hub.metrics().active_connections, 0);
    }

    /// Accepts nothing: every write waits forever
    struct StalledWriter;

    #[async_trait::async_trait]
    impl FrameWriter for StalledWriter {
        async fn write_text(&mut self, _text: String) -> Result<(), TransportError> {
            std::future::pending().await
        }

        async fn close(&mut self) -> Result<(), TransportError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_failure_aborts_stalled_writer() {
        let hub = Hub::spawn(&HubConfig::default());
        let (reader, _unused_writer, peer) = memory::transport();

        let task = tokio::spawn(serve_connection(hub.clone(), reader, StalledWriter));
        drop(peer);

        let id = timeout(WRITER_CLOSE_GRACE * 5, task).await.unwrap().unwrap();
        let snapshot = hub.snapshot().await.unwrap();
        assert!(!snapshot.connection_ids.contains(&id));
        assert_eq!(snapshot.active_connections, 0);
    }

    #[tokio::test]
    async fn test_write_failure_unregisters() {
        let hub = Hub::spawn(&HubConfig::default());
        let (reader, writer, peer) = memory::transport();
        let RemotePeer {
            to_relay: _to_relay,
            from_relay,
        } = peer;
        drop(from_relay);

        let task = tokio::spawn(serve_connection(hub.clone(), reader, writer));
        timeout(WAIT, task).await.unwrap().unwrap();

        assert_eq!(hub.snapshot().await.unwrap().active_connections, 0);
    }

    #[tokio::test]
    async fn test_closed_peer_stops_receiving_broadcasts() {
        let hub = Hub::spawn(&HubConfig::default());
        let (a, a_task) = spawn_peer(&hub);
        let (mut b, _b_task) = spawn_peer(&hub);
        next_message(&mut b).await;

        drop(a);
        timeout(WAIT, a_task).await.unwrap().unwrap();

        hub.broadcast(Message::update("only b")).await.unwrap();
        assert_eq!(next_message(&mut b).await.content(), "only b");
        assert_eq!(hub.snapshot().await.unwrap().active_connections, 1);
    }
}
