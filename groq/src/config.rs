//! HTTP client configuration.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default Groq API base URL (origin plus versioned prefix).
pub const GROQ_API_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Environment variable holding the API key when none is given explicitly.
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Default user agent sent by clients this crate builds itself.
pub const DEFAULT_USER_AGENT: &str = concat!("groq-rs/", env!("CARGO_PKG_VERSION"));

/// Settings for the `reqwest` client created when the caller does not supply one.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Whole-request timeout in seconds. Applies to the full streamed body too,
    /// so it is unset by default.
    pub timeout_secs: Option<u64>,
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// User agent string.
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            connect_timeout_secs: Some(30),
            user_agent: Some(DEFAULT_USER_AGENT.to_owned()),
        }
    }
}

impl HttpClientConfig {
    /// Build a reqwest client with this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the client cannot be built (for example
    /// when no TLS backend is available).
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        if let Some(timeout) = self.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(timeout));
        }

        if let Some(ref user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        builder
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))
    }
}
