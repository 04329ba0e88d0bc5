//! Streaming chat example.
//!
//! Prints the reply as it is generated. Press Ctrl-C to stop early.
//!
//! Run with: `cargo run --example streaming_chat`
//!
//! Note: Requires GROQ_API_KEY environment variable to be set.

use std::io::Write;

use futures::StreamExt;
use groq::{CancellationToken, ChatCompletionRequest, ChatMessage, Client};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::from_env()?;

    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let request = ChatCompletionRequest::default()
        .message(ChatMessage::user("Write a haiku about ownership."));

    let mut stream = client
        .create_chat_completion_stream_with_cancellation(request, token)
        .await?;

    let mut stdout = std::io::stdout();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if let Some(content) = chunk.content() {
            write!(stdout, "{content}")?;
            stdout.flush()?;
        }
        if let Some(reason) = chunk.finish_reason() {
            writeln!(stdout, "\n[finish: {reason}]")?;
        }
    }

    Ok(())
}
