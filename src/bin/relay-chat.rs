//! Terminal chat client for the relay
//!
//! Every line read from stdin is one turn. Turns are sent without waiting for the
//! previous one, and each reply is printed against the id of its own placeholder.

use std::env;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gemini_relay::client::{Entry, EntryKind, RelayClient, TurnId, TurnRunner, PENDING_TEXT};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_chat=info,gemini_relay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let relay_url = env::var("RELAY_URL").unwrap_or_else(|_| "http://localhost:3000".into());
    let client = RelayClient::new(&relay_url)?;

    let mut runner = TurnRunner::new(
        client,
        Arc::new(|id: TurnId, entry: &Entry| {
            let label = match entry.kind {
                EntryKind::Failed => "error",
                _ => "bot",
            };
            println!("[{}] {}: {}", id, label, entry.text);
        }),
    );

    tracing::info!("Talking to relay at {}", relay_url);
    println!("Type a message and press Enter. Ctrl-D quits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(turn) = runner.submit(&line).await {
            println!("[{}] bot: {}", turn.id, PENDING_TEXT);
        }
    }

    runner.finish().await;

    Ok(())
}
