/// Terminal display client for cliprelay
///
/// Shows whatever text the relay currently holds and lets you push new text
/// from stdin:
/// - any line: send it as an update
/// - `:clear`: clear the shared text
/// - `:quit` (or EOF): disconnect and exit
///
/// Usage:
///   cargo run --bin cliprelay_watch
///   cargo run --bin cliprelay_watch -- --url ws://192.168.1.20:8948/ws
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use cliprelay::{
    arguments::{patterns, print_debug_info, print_help},
    client::{drive_display, ClientChannels, DisplaySurface, RelayClient},
    config::{self, get_config_clone},
    logger::{self, LogTag},
    relay::Message,
};

/// Prints the shared text to the terminal
struct TerminalSurface;

impl DisplaySurface for TerminalSurface {
    fn show(&mut self, text: &str) {
        println!("{}", "=".repeat(60).dimmed());
        println!("{}", text.bold());
        println!("{}", "=".repeat(60).dimmed());
    }

    fn hide(&mut self) {
        println!("{}", "(cleared)".dimmed());
    }

    fn connected(&mut self) {
        println!("{}", "Connected to relay".green());
    }
}

#[tokio::main]
async fn main() {
    if patterns::is_help_requested() {
        print_help();
        return;
    }

    if let Err(e) = config::load_config() {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    }
    logger::init();
    print_debug_info();

    let mut settings = get_config_clone().client;
    if let Some(url) = patterns::get_server_url() {
        settings.server_url = url;
    }

    let client = RelayClient::from_config(&settings);
    logger::info(
        LogTag::Client,
        &format!("Watching relay at {}", client.url()),
    );
    let (channels, client_task) = client.spawn();
    let ClientChannels { outbound, inbound } = channels;

    let display = tokio::spawn(async move {
        drive_display(inbound, &mut TerminalSurface).await;
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                logger::error(LogTag::Client, &format!("Failed to read stdin: {}", e));
                break;
            }
        };

        let message = match line.trim() {
            "" => continue,
            ":quit" => break,
            ":clear" => Message::clear(),
            _ => Message::update(line.as_str()),
        };
        if outbound.send(message).await.is_err() {
            break;
        }
    }

    // Closing the outbound queue ends the session
    drop(outbound);
    match client_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => logger::error(LogTag::Client, &format!("Client stopped: {}", e)),
        Err(e) => logger::error(LogTag::Client, &format!("Client task failed: {}", e)),
    }
    let _ = display.await;
    logger::flush();
}
