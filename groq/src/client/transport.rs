//! Authenticated HTTP transport bound to a fixed base endpoint.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;

/// Issues requests against the base endpoint with the default headers.
///
/// Headers, including `Authorization`, are fixed at construction and attached
/// to every request. The transport holds no per-call state, so one instance
/// may be shared by concurrent calls.
#[derive(Clone)]
pub struct Transport {
    base_url: Arc<str>,
    headers: Arc<HeaderMap>,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field(
                "headers",
                &self
                    .headers
                    .iter()
                    .filter(|(k, _)| *k != AUTHORIZATION && !k.as_str().contains("api-key"))
                    .collect::<Vec<(&HeaderName, &HeaderValue)>>(),
            )
            .finish_non_exhaustive()
    }
}

impl Transport {
    pub(crate) fn from_parts(
        base_url: impl Into<Arc<str>>,
        headers: HeaderMap,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            headers: Arc::new(headers),
            http_client,
        }
    }

    /// Returns the base URL requests are sent to.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the headers attached to every request.
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the underlying HTTP client.
    #[inline]
    #[must_use]
    pub const fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Absolute URL for an API path such as `chat/completions`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Creates a request builder for `path` with the default headers attached.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, self.url(path))
            .headers(HeaderMap::clone(&self.headers))
    }

    /// Sends a request, with `body` encoded as JSON when given.
    ///
    /// Resolves as soon as the response headers arrive; the body is left
    /// unread so it can be streamed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`](crate::Error::Http) if the request cannot be
    /// sent or no response headers are received.
    pub async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let mut builder = self.request(method.clone(), path);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(%method, path, "sending request");
        let response = builder.send().await?;
        debug!(status = %response.status(), "received response headers");

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;

    fn transport(base_url: &str) -> Transport {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Transport::from_parts(base_url, headers, reqwest::Client::new())
    }

    #[test]
    fn test_url_join() {
        assert_eq!(
            transport("https://api.groq.com/openai/v1").url("chat/completions"),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            transport("http://localhost:8080/v1/").url("/models"),
            "http://localhost:8080/v1/models"
        );
    }

    #[test]
    fn test_request_carries_default_headers() {
        let request = transport("http://localhost/v1")
            .request(Method::GET, "models")
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://localhost/v1/models");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer secret");
    }

    #[test]
    fn test_debug_hides_authorization() {
        let debug = format!("{:?}", transport("http://localhost/v1"));
        assert!(!debug.contains("secret"));
        assert!(debug.contains("application/json"));
    }
}
