//! Chat completion example.
//!
//! Sends a short conversation and prints the reply with token usage.
//!
//! Run with: `cargo run --example chat_completion`
//!
//! Note: Requires GROQ_API_KEY environment variable to be set.

use groq::{ChatCompletionRequest, ChatMessage, Client, LLAMA_3_1_8B_INSTANT};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::from_env()?;

    let request = ChatCompletionRequest::new(LLAMA_3_1_8B_INSTANT)
        .message(ChatMessage::system("You answer in one sentence."))
        .message(ChatMessage::user("What is the borrow checker?"))
        .with_temperature(0.2)
        .with_max_tokens(128);

    let response = client.create_chat_completion(request).await?;

    println!("{}", response.text().unwrap_or_default());
    if let Some(usage) = response.usage {
        println!(
            "\n[{} prompt + {} completion = {} tokens]",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }

    Ok(())
}
