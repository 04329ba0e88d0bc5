//! Credential resolution and the bearer header.

use reqwest::header::HeaderValue;

use crate::config::GROQ_API_KEY_ENV;
use crate::error::{Error, Result};

/// A validated, non-blank API key.
#[derive(Clone)]
pub struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl ApiKey {
    /// Validate an explicit key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the key is empty or whitespace only.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::config("API key cannot be null or empty"));
        }
        Ok(Self(key))
    }

    /// Resolve the key: the explicit value if given, else `GROQ_API_KEY`.
    ///
    /// An explicit value is never replaced by the environment, even when blank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no key is available or the key is blank.
    pub fn resolve(explicit: Option<String>) -> Result<Self> {
        Self::resolve_with(explicit, |name| std::env::var(name).ok())
    }

    pub(crate) fn resolve_with(
        explicit: Option<String>,
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> Result<Self> {
        match explicit {
            Some(key) => Self::new(key),
            None => lookup(GROQ_API_KEY_ENV).map_or_else(
                || {
                    Err(Error::config(format!(
                        "{GROQ_API_KEY_ENV} environment variable is not set"
                    )))
                },
                Self::new,
            ),
        }
    }

    /// The `Authorization: Bearer` header value, marked sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the key contains characters not allowed
    /// in a header.
    pub fn bearer_header(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0))
            .map_err(|e| Error::config(format!("API key is not a valid header value: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}
