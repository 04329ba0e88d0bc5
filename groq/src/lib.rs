//! Groq is a Rust client for the Groq chat completions API, with lazy streaming
//! of completion chunks.
//!
//! ```rust,ignore
//! use groq::{ChatCompletionRequest, ChatMessage, Client};
//!
//! let client = Client::from_env()?;
//! let request = ChatCompletionRequest::default()
//!     .message(ChatMessage::system("You are terse."))
//!     .message(ChatMessage::user("What is Rust?"));
//!
//! let response = client.create_chat_completion(request).await?;
//! println!("{}", response.text().unwrap_or_default());
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod streaming;
pub mod types;

pub use client::{ApiKey, Client, ClientBuilder, GroqApi, Transport};
pub use config::HttpClientConfig;
pub use error::{ApiError, Error, Result};
pub use streaming::{ChatCompletionStream, ChunkStream};
pub use tokio_util::sync::CancellationToken;
pub use types::*;
