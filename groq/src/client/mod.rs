//! Groq API client.
//!
//! - **[`Client`]**: the completion service (chat completions, streaming chat
//!   completions, model listing)
//! - **[`ClientBuilder`]**: fluent builder for constructing clients
//! - **[`Transport`]**: authenticated HTTP requests against the base endpoint
//! - **[`GroqApi`]**: the operations as a trait, for substitution in tests
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use groq::{ChatCompletionRequest, ChatMessage, Client};
//!
//! let client = Client::from_env()?;
//! let request = ChatCompletionRequest::default().message(ChatMessage::user("Hello!"));
//!
//! let mut stream = client.create_chat_completion_stream(request).await?;
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?.content().unwrap_or_default());
//! }
//! ```

mod auth;
mod builder;
mod transport;

pub use auth::ApiKey;
pub use builder::ClientBuilder;
pub use transport::Transport;

use std::pin::pin;

use async_trait::async_trait;
use futures::StreamExt;
use futures::future::{Either, select};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::error::{ApiError, Error, Result};
use crate::streaming::{ChatCompletionStream, ChunkStream};
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ModelList, from_json_object};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
const MODELS_PATH: &str = "models";

/// The operations offered by the Groq API.
#[async_trait]
pub trait GroqApi: Send + Sync {
    /// Create a chat completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid, the API call fails or the
    /// response cannot be decoded.
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;

    /// Create a streaming chat completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or the API call fails before
    /// the stream starts.
    async fn create_chat_completion_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionStream>;

    /// Create a streaming chat completion that stops when `cancellation` fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid, the API call fails before
    /// the stream starts, or `cancellation` fires before the response headers
    /// arrive.
    async fn create_chat_completion_stream_with_cancellation(
        &self,
        request: ChatCompletionRequest,
        cancellation: CancellationToken,
    ) -> Result<ChatCompletionStream>;

    /// List available models.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails or the response cannot be decoded.
    async fn list_models(&self) -> Result<ModelList>;
}

/// Client for the Groq API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct Client {
    transport: Transport,
}

impl Client {
    /// Create a client with an explicit API key and default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the key is blank or the HTTP client
    /// cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a client using the `GROQ_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the variable is unset or blank.
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub(crate) const fn from_transport(transport: Transport) -> Self {
        Self { transport }
    }

    /// Returns the transport used by this client.
    #[must_use]
    pub const fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Create a chat completion.
    ///
    /// An unset `stream` flag is sent as `false`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the request has no model or no messages
    /// - [`Error::Api`] on a non-success status
    /// - [`Error::MalformedResponse`] if a success body cannot be decoded
    /// - [`Error::Http`] on transport failure
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn create_chat_completion(
        &self,
        mut request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        validate(&request)?;
        request.stream.get_or_insert(false);

        let response = self
            .transport
            .send(Method::POST, CHAT_COMPLETIONS_PATH, Some(&request))
            .await?;

        decode_json(ensure_success(response).await?).await
    }

    /// Create a streaming chat completion.
    ///
    /// The `stream` flag is always sent as `true`. Only the response headers
    /// are awaited; chunks are decoded as the returned stream is polled.
    /// Dropping the stream closes the connection.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the request has no model or no messages
    /// - [`Error::Api`] on a non-success status, before any chunk is produced
    /// - [`Error::Http`] on transport failure
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn create_chat_completion_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionStream> {
        let response = self.open_stream(request).await?;
        Ok(ChunkStream::new(response.bytes_stream().boxed()))
    }

    /// Create a streaming chat completion that stops when `cancellation` fires.
    ///
    /// Cancellation while waiting for the response headers fails with
    /// [`Error::Cancelled`]; once streaming, the stream simply ends.
    ///
    /// # Errors
    ///
    /// Same as [`create_chat_completion_stream`](Self::create_chat_completion_stream),
    /// plus [`Error::Cancelled`].
    #[instrument(skip(self, request, cancellation), fields(model = %request.model))]
    pub async fn create_chat_completion_stream_with_cancellation(
        &self,
        request: ChatCompletionRequest,
        cancellation: CancellationToken,
    ) -> Result<ChatCompletionStream> {
        validate(&request)?;
        if cancellation.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let open = pin!(self.open_stream(request));
        let cancelled = pin!(cancellation.clone().cancelled_owned());

        match select(open, cancelled).await {
            Either::Left((response, _)) => {
                Ok(ChunkStream::new(response?.bytes_stream().boxed()).with_cancellation(cancellation))
            }
            Either::Right(((), _)) => {
                debug!("cancelled while awaiting response headers");
                Err(Error::Cancelled)
            }
        }
    }

    /// List available models.
    ///
    /// # Errors
    ///
    /// - [`Error::Api`] on a non-success status
    /// - [`Error::MalformedResponse`] if a success body cannot be decoded
    /// - [`Error::Http`] on transport failure
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Result<ModelList> {
        let response = self
            .transport
            .send::<()>(Method::GET, MODELS_PATH, None)
            .await?;

        decode_json(ensure_success(response).await?).await
    }

    async fn open_stream(&self, mut request: ChatCompletionRequest) -> Result<Response> {
        validate(&request)?;
        request.stream = Some(true);

        let response = self
            .transport
            .send(Method::POST, CHAT_COMPLETIONS_PATH, Some(&request))
            .await?;

        ensure_success(response).await
    }
}

#[async_trait]
impl GroqApi for Client {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        Self::create_chat_completion(self, request).await
    }

    async fn create_chat_completion_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionStream> {
        Self::create_chat_completion_stream(self, request).await
    }

    async fn create_chat_completion_stream_with_cancellation(
        &self,
        request: ChatCompletionRequest,
        cancellation: CancellationToken,
    ) -> Result<ChatCompletionStream> {
        Self::create_chat_completion_stream_with_cancellation(self, request, cancellation).await
    }

    async fn list_models(&self) -> Result<ModelList> {
        Self::list_models(self).await
    }
}

/// Local check that a request has a model and at least one message.
///
/// Everything else is left to the API.
fn validate(request: &ChatCompletionRequest) -> Result<()> {
    if request.model.trim().is_empty() {
        return Err(Error::invalid_argument("request model must not be empty"));
    }
    if request.messages.is_empty() {
        return Err(Error::invalid_argument(
            "request must contain at least one message",
        ));
    }
    Ok(())
}

/// Pass a success response through, or turn a failure into [`Error::Api`].
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    let error = ApiError::from_response_body(status, &body);
    warn!(status = %status, message = %error.message, "API request failed");
    Err(error.into())
}

/// Read the whole body and decode it as JSON.
async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await?;
    from_json_object(&body).map_err(Error::MalformedResponse)
}
