//! Client builder.

use reqwest::header::{AUTHORIZATION, HeaderMap};

use crate::config::{GROQ_API_BASE_URL, HttpClientConfig};
use crate::error::{Error, Result};

use super::Client;
use super::auth::ApiKey;
use super::transport::Transport;

/// Builder for constructing [`Client`] instances.
///
/// ```rust,ignore
/// let client = groq::Client::builder()
///     .api_key("gsk_...")
///     .timeout_secs(60)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    headers: HeaderMap,
    http_client: Option<reqwest::Client>,
    keep_client_auth: bool,
    config: HttpClientConfig,
}

impl ClientBuilder {
    /// Sets the API key. Without it, `GROQ_API_KEY` is read at build time.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL, e.g. for a proxy or a test server.
    #[must_use]
    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = Some(base_url.as_ref().to_owned());
        self
    }

    /// Uses a caller-configured HTTP client.
    ///
    /// Timeout and user agent settings on this builder are ignored then.
    ///
    /// The bearer header built from the API key is sent with every request
    /// and takes precedence over an `Authorization` default header of this
    /// client. Use [`keep_client_auth`](Self::keep_client_auth) to keep the
    /// client's own, or pass it through [`http_headers`](Self::http_headers).
    #[must_use]
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Authenticates with the `Authorization` default header of the client
    /// given to [`http_client`](Self::http_client).
    ///
    /// No API key is resolved and no bearer header is attached.
    #[must_use]
    pub const fn keep_client_auth(mut self) -> Self {
        self.keep_client_auth = true;
        self
    }

    /// Sets headers sent with every request.
    ///
    /// An `Authorization` header given here is kept as is.
    #[must_use]
    pub fn http_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the whole-request timeout in seconds.
    #[must_use]
    pub const fn timeout_secs(mut self, timeout: u64) -> Self {
        self.config.timeout_secs = Some(timeout);
        self
    }

    /// Sets the connect timeout in seconds.
    #[must_use]
    pub const fn connect_timeout_secs(mut self, timeout: u64) -> Self {
        self.config.connect_timeout_secs = Some(timeout);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Replaces the whole HTTP client configuration.
    #[must_use]
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the client.
    ///
    /// The credential is resolved here, once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if no API key is
    /// available, the key is blank or not a valid header value, the HTTP
    /// client cannot be built, or
    /// [`keep_client_auth`](Self::keep_client_auth) is set without a client.
    pub fn build(self) -> Result<Client> {
        let Self {
            api_key,
            base_url,
            mut headers,
            http_client,
            keep_client_auth,
            config,
        } = self;

        if keep_client_auth {
            if http_client.is_none() {
                return Err(Error::config(
                    "keep_client_auth requires a caller-supplied http client",
                ));
            }
        } else {
            let api_key = ApiKey::resolve(api_key)?;
            if !headers.contains_key(AUTHORIZATION) {
                headers.insert(AUTHORIZATION, api_key.bearer_header()?);
            }
        }

        let http_client = match http_client {
            Some(client) => client,
            None => config.build_client()?,
        };
        let base_url = base_url.unwrap_or_else(|| GROQ_API_BASE_URL.to_owned());

        Ok(Client::from_transport(Transport::from_parts(
            base_url,
            headers,
            http_client,
        )))
    }
}
