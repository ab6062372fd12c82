use std::sync::Arc;
use tokio::sync::Notify;

use cliprelay::{
    arguments::{patterns, print_debug_info, print_help},
    config::{self, get_config_clone},
    errors::RelayError,
    logger::{self as logger, LogTag},
    relay::Hub,
    webserver,
};

/// Main entry point for the relay server
///
/// Loads configuration, starts the hub and serves `/ws` until POST /shutdown
/// or Ctrl-C.
#[tokio::main]
async fn main() {
    if patterns::is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    // Ensure all directories exist BEFORE logger initialization
    if let Err(e) = cliprelay::paths::ensure_all_directories() {
        eprintln!("Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = config::load_config().map_err(RelayError::Config) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    logger::init();
    logger::info(LogTag::System, "cliprelay server starting up...");
    print_debug_info();

    let mut settings = get_config_clone();
    if let Some(host) = patterns::get_host() {
        settings.webserver.host = host;
    }
    if let Some(port) = patterns::get_port() {
        settings.webserver.port = port;
    }

    let hub = Hub::spawn(&settings.hub);
    let shutdown = Arc::new(Notify::new());

    let ctrlc_shutdown = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        logger::info(LogTag::System, "Ctrl-C received, shutting down...");
        ctrlc_shutdown.notify_one();
    }) {
        logger::warning(
            LogTag::System,
            &format!("Failed to install Ctrl-C handler: {}", e),
        );
    }

    let result = webserver::start_server(&settings.webserver, hub, shutdown).await;

    match result {
        Ok(()) => {
            logger::info(LogTag::System, "cliprelay server stopped");
            logger::flush();
        }
        Err(e) => {
            logger::error(LogTag::System, &format!("Server failed: {}", e));
            logger::flush();
            std::process::exit(1);
        }
    }
}
