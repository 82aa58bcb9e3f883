//! Headless REPL for the chat core.
//!
//! Streams answers about the uploaded document to stdout, one question per
//! line. Intended for development against a running backend; the real
//! presentation layer is a separate surface.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use paperchat_core::{ChatBackend, ChatClient, ChatConfig, ChatEvent, ChatSession, HttpBackend};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ChatConfig::from_env();
    tracing::info!(base_url = %config.base_url, "connecting to backend");

    let backend = HttpBackend::new(config);
    if !backend.health_check().await {
        tracing::warn!("backend is not responding; questions will fail until it is up");
    }

    let mut session = ChatSession::new(ChatClient::new(Arc::new(backend)));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_prompt()?;
    while let Some(line) = lines.next_line().await? {
        let question = line.trim();
        if question.is_empty() {
            print_prompt()?;
            continue;
        }
        if question == "/quit" {
            break;
        }

        let mut events = session.send(question).await?;
        while let Some(event) = events.recv().await {
            if let ChatEvent::Chunk(text) = &event {
                print!("{text}");
                std::io::stdout().flush()?;
            }
            session.apply(event);
        }
        println!();

        if let Some(error) = session.conversation().error() {
            eprintln!("error: {error}");
        }
        print_prompt()?;
    }

    Ok(())
}

fn print_prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}
