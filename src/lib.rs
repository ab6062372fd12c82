//! cliprelay: one shared piece of clipboard text, relayed to every connected display
//!
//! - `relay`: message codec, connection hub and per-peer pumps
//! - `client`: display-side session with reconnection
//! - `webserver`: axum server exposing the relay over WebSocket (feature `web`)

pub mod arguments;
pub mod client;
pub mod config;
pub mod errors;
pub mod logger;
pub mod paths;
pub mod relay;

#[cfg(feature = "web")]
pub mod webserver;
