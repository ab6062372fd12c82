use clap::Parser;
use std::time::Duration;

use cliprelay::relay::transport::{self, FrameReader, FrameWriter};
use cliprelay::relay::{Message, MessageKind};

#[derive(Parser)]
#[command(name = "debug_push")]
#[command(about = "Push one update or clear to a cliprelay server and print what comes back", long_about = None)]
struct Args {
    /// Relay WebSocket URL
    #[arg(short, long, default_value = "ws://localhost:8948/ws")]
    url: String,

    /// Text to publish as an update
    #[arg(short, long, conflicts_with = "clear")]
    content: Option<String>,

    /// Publish a clear instead of an update
    #[arg(long)]
    clear: bool,

    /// Seconds to keep listening after sending
    #[arg(short, long, default_value = "2")]
    listen: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("cliprelay push tool");
    println!("{}", "=".repeat(60));

    let (mut reader, mut writer) = transport::connect(&args.url).await?;
    println!("Connected to {}", args.url);

    let confirmation = Message::decode(&reader.read_frame().await?)?;
    if confirmation.kind() != MessageKind::Connected {
        println!("Unexpected first message: {}", confirmation.encode());
    }

    let message = if args.clear {
        Message::clear()
    } else {
        Message::update(args.content.unwrap_or_default())
    };
    println!("-> {}", message.encode());
    writer.write_text(message.encode()).await?;

    let deadline = tokio::time::sleep(Duration::from_secs(args.listen));
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            frame = reader.read_frame() => {
                let frame = frame?;
                match Message::decode(&frame) {
                    Ok(received) => println!("<- {}", received.encode()),
                    Err(e) => println!("<- undecodable frame: {}", e),
                }
            }
        }
    }

    writer.close().await?;
    println!("{}", "=".repeat(60));
    Ok(())
}
