/// Display client for the clipboard relay
///
/// `RelayClient` keeps one WebSocket session to the relay alive:
/// - decoded inbound messages are forwarded to the `inbound` channel
/// - messages pushed on the `outbound` channel are written to the relay
/// - a lost session (or a failed first dial) goes through the reconnect policy
///
/// Dropping the outbound sender ends the client cleanly, also while it is
/// dialing or waiting to reconnect. Outbound messages queued while
/// disconnected are sent once the next session is up.
pub mod display;
pub mod reconnect;

pub use display::{drive_display, DisplayAction, DisplaySurface};
pub use reconnect::{reconnect, ReconnectPolicy};

use std::collections::VecDeque;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::errors::{RelayError, TransportError};
use crate::logger::{self, LogTag};
use crate::relay::transport::{self, ClientReader, ClientWriter, FrameReader, FrameWriter};
use crate::relay::Message;

/// Inbound capacity; the display drains it continuously
const INBOUND_QUEUE_CAPACITY: usize = 64;

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The application dropped its side of the client
    Shutdown,
    /// The transport failed; reconnect
    Lost(TransportError),
}

/// Application side of a running client
pub struct ClientChannels {
    pub outbound: mpsc::Sender<Message>,
    pub inbound: mpsc::Receiver<Message>,
}

pub struct RelayClient {
    url: String,
    policy: ReconnectPolicy,
    outbound_capacity: usize,
}

impl RelayClient {
    pub fn new(url: impl Into<String>, policy: ReconnectPolicy, outbound_capacity: usize) -> Self {
        Self {
            url: url.into(),
            policy,
            outbound_capacity: outbound_capacity.max(1),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.server_url.clone(),
            ReconnectPolicy::from_config(config),
            config.outbound_queue_capacity,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Start the client task
    ///
    /// The task resolves with `Ok(())` after a clean shutdown, or with
    /// `ReconnectExhausted` when a bounded policy gives up.
    pub fn spawn(self) -> (ClientChannels, JoinHandle<Result<(), RelayError>>) {
        let (outbound_tx, outbound_rx) = mpsc::channel(self.outbound_capacity);
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE_CAPACITY);

        let task = tokio::spawn(self.run(outbound_rx, inbound_tx));
        let channels = ClientChannels {
            outbound: outbound_tx,
            inbound: inbound_rx,
        };
        (channels, task)
    }

    async fn run(
        self,
        mut outbound: mpsc::Receiver<Message>,
        inbound: mpsc::Sender<Message>,
    ) -> Result<(), RelayError> {
        logger::info(
            LogTag::Client,
            &format!("Connecting to relay at {}", self.url),
        );

        let mut held = VecDeque::new();

        let first = match self
            .unless_shutdown(transport::connect(&self.url), &mut outbound, &mut held)
            .await
        {
            Some(result) => result,
            None => return self.shut_down(),
        };
        let mut session = match first {
            Ok(halves) => halves,
            Err(e) => {
                logger::warning(LogTag::Client, &format!("Initial connect failed: {}", e));
                match self.redial(&mut outbound, &mut held).await {
                    Some(result) => result?,
                    None => return self.shut_down(),
                }
            }
        };

        loop {
            let (reader, mut writer) = session;
            let end = match flush_held(&mut writer, &mut held).await {
                Ok(()) => run_session(reader, writer, &mut outbound, &inbound).await,
                Err(e) => SessionEnd::Lost(e),
            };
            match end {
                SessionEnd::Shutdown => return self.shut_down(),
                SessionEnd::Lost(e) => {
                    logger::warning(LogTag::Client, &format!("Connection lost: {}", e));
                    session = match self.redial(&mut outbound, &mut held).await {
                        Some(result) => result?,
                        None => return self.shut_down(),
                    };
                }
            }
        }
    }

    async fn redial(
        &self,
        outbound: &mut mpsc::Receiver<Message>,
        held: &mut VecDeque<Message>,
    ) -> Option<Result<(ClientReader, ClientWriter), RelayError>> {
        let attempt = reconnect(&self.policy, || transport::connect(&self.url));
        self.unless_shutdown(attempt, outbound, held).await
    }

    /// Run `work` while keeping an eye on the outbound queue
    ///
    /// Returns None as soon as the application drops its sender. Actions that
    /// arrive meanwhile are held (oldest dropped past `outbound_capacity`).
    async fn unless_shutdown<T>(
        &self,
        work: impl Future<Output = T>,
        outbound: &mut mpsc::Receiver<Message>,
        held: &mut VecDeque<Message>,
    ) -> Option<T> {
        tokio::pin!(work);
        loop {
            tokio::select! {
                result = &mut work => return Some(result),
                action = outbound.recv() => match action {
                    Some(message) => {
                        if held.len() >= self.outbound_capacity {
                            held.pop_front();
                            logger::warning(LogTag::Client, "Dropping oldest action queued while offline");
                        }
                        held.push_back(message);
                    }
                    None => return None,
                },
            }
        }
    }

    fn shut_down(&self) -> Result<(), RelayError> {
        logger::info(LogTag::Client, "Client shutting down");
        Ok(())
    }
}

/// Send actions held while disconnected; a failed write keeps the rest held
async fn flush_held<W: FrameWriter>(
    writer: &mut W,
    held: &mut VecDeque<Message>,
) -> Result<(), TransportError> {
    while let Some(message) = held.front() {
        writer.write_text(message.encode()).await?;
        held.pop_front();
    }
    Ok(())
}

/// Drive one connected session until the transport fails or the app leaves
pub async fn run_session<R, W>(
    mut reader: R,
    mut writer: W,
    outbound: &mut mpsc::Receiver<Message>,
    inbound: &mpsc::Sender<Message>,
) -> SessionEnd
where
    R: FrameReader,
    W: FrameWriter,
{
    loop {
        tokio::select! {
            frame = reader.read_frame() => {
                let bytes = match frame {
                    Ok(bytes) => bytes,
                    Err(e) => return SessionEnd::Lost(e),
                };
                match Message::decode(&bytes) {
                    Ok(message) => {
                        logger::debug(
                            LogTag::Client,
                            &format!("Received {}: {}", message.kind(), message.content()),
                        );
                        if inbound.send(message).await.is_err() {
                            let _ = writer.close().await;
                            return SessionEnd::Shutdown;
                        }
                    }
                    Err(e) => logger::warning(LogTag::Client, &format!("Dropping message: {}", e)),
                }
            }
            action = outbound.recv() => {
                match action {
                    Some(message) => {
                        if let Err(e) = writer.write_text(message.encode()).await {
                            return SessionEnd::Lost(e);
                        }
                    }
                    None => {
                        let _ = writer.close().await;
                        return SessionEnd::Shutdown;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::transport::memory::{self, Frame};
    use crate::relay::MessageKind;
    use std::time::Duration;

    #[tokio::test]
    async fn test_session_forwards_both_directions() {
        let (reader, writer, mut peer) = memory::transport();
        let (outbound_tx, mut outbound_rx) = mpsc::channel(10);
        let (inbound_tx, mut inbound_rx) = mpsc::channel(10);

        let session = tokio::spawn(async move {
            run_session(reader, writer, &mut outbound_rx, &inbound_tx).await
        });

        peer.send_text(r#"{"type":"connected"}"#);
        peer.send_text("garbage");
        peer.send_text(r#"{"type":"update","content":"from relay"}"#);
        assert_eq!(inbound_rx.recv().await.unwrap().kind(), MessageKind::Connected);
        assert_eq!(inbound_rx.recv().await.unwrap().content(), "from relay");

        outbound_tx.send(Message::update("from app")).await.unwrap();
        match peer.from_relay.recv().await {
            Some(Frame::Text(text)) => {
                assert_eq!(Message::decode(text.as_bytes()).unwrap().content(), "from app")
            }
            other => panic!("unexpected frame {:?}", other),
        }

        drop(outbound_tx);
        assert_eq!(session.await.unwrap(), SessionEnd::Shutdown);
        assert_eq!(peer.from_relay.recv().await, Some(Frame::Close));
    }

    #[tokio::test]
    async fn test_session_reports_lost_transport() {
        let (reader, writer, peer) = memory::transport();
        let (_outbound_tx, mut outbound_rx) = mpsc::channel(10);
        let (inbound_tx, _inbound_rx) = mpsc::channel(10);

        drop(peer);
        let end = run_session(reader, writer, &mut outbound_rx, &inbound_tx).await;
        assert_eq!(end, SessionEnd::Lost(TransportError::Closed));
    }

    #[tokio::test]
    async fn test_client_gives_up_on_unreachable_relay() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RelayClient::new(
            format!("ws://{}/ws", addr),
            ReconnectPolicy {
                interval: Duration::from_millis(10),
                max_attempts: Some(2),
            },
            10,
        );
        let (_channels, task) = client.spawn();

        let result = tokio::time::timeout(Duration::from_secs(10), task)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            result,
            Err(RelayError::ReconnectExhausted { attempts: 2 })
        ));
    }

    #[tokio::test]
    async fn test_client_stops_while_reconnecting() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RelayClient::new(
            format!("ws://{}/ws", addr),
            ReconnectPolicy {
                interval: Duration::from_millis(10),
                max_attempts: None,
            },
            10,
        );
        let (channels, task) = client.spawn();
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(channels);

        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_held_actions_flush_in_order() {
        let (_reader, mut writer, mut peer) = memory::transport();
        let mut held = VecDeque::from(vec![Message::update("one"), Message::clear()]);

        flush_held(&mut writer, &mut held).await.unwrap();
        assert!(held.is_empty());

        for expected in [MessageKind::Update, MessageKind::Clear] {
            match peer.from_relay.recv().await {
                Some(Frame::Text(text)) => {
                    assert_eq!(Message::decode(text.as_bytes()).unwrap().kind(), expected)
                }
                other => panic!("unexpected frame {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_failed_flush_keeps_actions_held() {
        let (_reader, mut writer, peer) = memory::transport();
        drop(peer);
        let mut held = VecDeque::from(vec![Message::update("kept")]);

        assert!(flush_held(&mut writer, &mut held).await.is_err());
        assert_eq!(held.len(), 1);
    }

    #[test]
    fn test_client_from_config() {
        let client = RelayClient::from_config(&ClientConfig::default());
        assert_eq!(client.url(), "ws://localhost:8948/ws");
        assert_eq!(client.policy, ReconnectPolicy::default());
        assert_eq!(client.outbound_capacity, 10);
    }
}
