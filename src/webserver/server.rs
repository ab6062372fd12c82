/// Axum webserver implementation
///
/// Server lifecycle: bind, serve the relay routes, stop gracefully when the
/// shutdown notifier fires (POST /shutdown or Ctrl-C).
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::cors::CorsLayer;

use crate::{
    config::WebserverConfig,
    errors::RelayError,
    logger::{self, LogTag},
    relay::HubHandle,
    webserver::{routes, state::AppState},
};

/// Bind the configured address and serve until `shutdown` fires
///
/// This function blocks until the server is shut down
pub async fn start_server(
    config: &WebserverConfig,
    hub: HubHandle,
    shutdown: Arc<Notify>,
) -> Result<(), RelayError> {
    let addr = format!("{}:{}", config.host, config.port);
    logger::debug(
        LogTag::Webserver,
        &format!("Starting webserver on {}", addr),
    );

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| RelayError::Bind {
            reason: bind_failure_reason(&e, config.port),
            addr: addr.clone(),
        })?;

    let state = Arc::new(AppState::new(
        hub,
        shutdown,
        Duration::from_millis(config.shutdown_delay_ms),
    ));

    serve(listener, state).await
}

/// Serve the relay routes on an already bound listener
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), RelayError> {
    let local_addr = listener.local_addr()?;
    logger::info(
        LogTag::Webserver,
        &format!("Relay listening on ws://{}/ws", local_addr),
    );

    let shutdown = state.shutdown.clone();
    let shutdown_signal = async move {
        shutdown.notified().await;
        logger::debug(
            LogTag::Webserver,
            "Received shutdown signal, stopping webserver...",
        );
    };

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    logger::info(LogTag::Webserver, "Webserver stopped gracefully");
    Ok(())
}

/// Build the Axum application with all routes and middleware
fn build_app(state: Arc<AppState>) -> Router {
    routes::create_router(state).layer(CorsLayer::permissive())
}

fn bind_failure_reason(error: &std::io::Error, port: u16) -> String {
    match error.kind() {
        std::io::ErrorKind::AddrInUse => {
            "address already in use (is another relay running?)".to_string()
        }
        std::io::ErrorKind::PermissionDenied => format!(
            "permission denied; port {} may require elevated privileges",
            port
        ),
        _ => error.to_string(),
    }
}
