//! List models example.
//!
//! Run with: `cargo run --example list_models`
//!
//! Note: Requires GROQ_API_KEY environment variable to be set.

use groq::Client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = Client::from_env()?;

    let models = client.list_models().await?;
    for model in models.active() {
        match model.context_window {
            Some(window) => println!("{:<40} {:<12} {window}", model.id, model.owned_by),
            None => println!("{:<40} {}", model.id, model.owned_by),
        }
    }

    Ok(())
}
