/// Relay message schema and JSON codec
///
/// Wire format:
/// ```text
/// { "type": "update" | "clear" | "connected", "content"?: string, "timestamp"?: integer }
/// ```
/// - `content` is omitted when empty, `timestamp` when zero
/// - Unknown fields are ignored on decode
/// - Clear and Connected never carry content
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::DecodeError;

// ============================================================================
// MESSAGE KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Replace the shared text
    Update,
    /// Drop the shared text
    Clear,
    /// Local confirmation sent once to a newly registered peer
    Connected,
}

impl MessageKind {
    pub fn code(&self) -> &'static str {
        match self {
            MessageKind::Update => "update",
            MessageKind::Clear => "clear",
            MessageKind::Connected => "connected",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// MESSAGE
// ============================================================================

/// Immutable relay message
///
/// The timestamp (unix seconds) is assigned by the constructors and never
/// touched on send or receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    kind: MessageKind,
    content: String,
    timestamp: i64,
}

/// Decode-side view of the wire object
#[derive(Deserialize)]
struct WireMessage {
    #[serde(rename = "type")]
    kind: MessageKind,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

impl Message {
    /// Update carrying `content`, stamped now
    pub fn update(content: impl Into<String>) -> Self {
        Self::from_parts(MessageKind::Update, content.into(), now())
    }

    /// Clear, stamped now
    pub fn clear() -> Self {
        Self::from_parts(MessageKind::Clear, String::new(), now())
    }

    /// Connection confirmation, stamped now
    pub fn connected() -> Self {
        Self::from_parts(MessageKind::Connected, String::new(), now())
    }

    /// Build a message with an explicit timestamp
    ///
    /// Content passed for Clear/Connected is discarded.
    pub fn from_parts(kind: MessageKind, content: String, timestamp: i64) -> Self {
        let content = match kind {
            MessageKind::Update => content,
            MessageKind::Clear | MessageKind::Connected => String::new(),
        };
        Self {
            kind,
            content,
            timestamp,
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// True for an Update without content, which consumers treat as a clear
    pub fn is_empty_update(&self) -> bool {
        self.kind == MessageKind::Update && self.content.is_empty()
    }

    /// Canonical JSON text
    ///
    /// Keys are emitted in a fixed order, so equal messages encode identically.
    pub fn encode(&self) -> String {
        let mut object = Map::new();
        object.insert("type".to_string(), Value::from(self.kind.code()));
        if !self.content.is_empty() {
            object.insert("content".to_string(), Value::from(self.content.as_str()));
        }
        if self.timestamp != 0 {
            object.insert("timestamp".to_string(), Value::from(self.timestamp));
        }
        Value::Object(object).to_string()
    }

    /// Parse a wire payload
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let wire: WireMessage = serde_json::from_slice(bytes)?;
        Ok(Self::from_parts(
            wire.kind,
            wire.content.unwrap_or_default(),
            wire.timestamp.unwrap_or(0),
        ))
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
