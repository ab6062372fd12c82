/// Relay HTTP/WebSocket server (axum)
///
/// Routes:
/// - `GET /ws`: WebSocket upgrade; each socket joins the hub
/// - `POST /shutdown`: graceful stop after a short delay
/// - `GET /status`: hub membership and counters as JSON
mod server;

pub mod routes;
pub mod state;

pub use server::{serve, start_server};
pub use state::AppState;
