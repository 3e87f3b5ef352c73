//! Upstream HTTP client.
//!
//! # Responsibilities
//! - Issue the single outbound GET for a proxy request
//! - Send the caller's User-Agent (or the configured default) and the injected Referer
//! - Follow redirects and decompress transparently
//! - Bound the wait for response headers and for buffered bodies

use std::time::Duration;

use axum::http::StatusCode;
use bytes::Bytes;
use futures_util::Stream;
use reqwest::header::{CONTENT_TYPE, REFERER, USER_AGENT};
use reqwest::redirect::Policy;
use tokio::time;
use url::Url;

use crate::config::UpstreamConfig;
use crate::fetch::{classify, ContentClass, FetchError, ProxyRequest};

/// Fetches proxy targets. Cheap to share; holds a pooled client.
#[derive(Debug, Clone)]
pub struct FetchEngine {
    client: reqwest::Client,
    default_user_agent: String,
    timeout: Duration,
    fail_on_server_error: bool,
}

impl FetchEngine {
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::limited(config.max_redirects))
            // Keep the injected Referer across redirects.
            .referer(false)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            default_user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            fail_on_server_error: config.fail_on_server_error,
        })
    }

    /// Fetch `request.target_url()`, presenting `user_agent` when the caller sent one.
    pub async fn fetch(
        &self,
        request: &ProxyRequest,
        user_agent: Option<&str>,
    ) -> Result<FetchedResource, FetchError> {
        let mut builder = self
            .client
            .get(request.target_url().clone())
            .header(USER_AGENT, user_agent.unwrap_or(&self.default_user_agent));
        if !request.referrer().is_empty() {
            builder = builder.header(REFERER, request.referrer());
        }

        let response = match time::timeout(self.timeout, builder.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(FetchError::from_send(e, self.timeout)),
            Err(_) => return Err(FetchError::Timeout(self.timeout)),
        };

        let status = response.status();
        if self.fail_on_server_error && status.is_server_error() {
            return Err(FetchError::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let class = classify(content_type.as_deref());

        tracing::debug!(
            target_url = %request.target_url(),
            final_url = %response.url(),
            status = %status,
            content_type = content_type.as_deref().unwrap_or("-"),
            class = ?class,
            "Upstream responded"
        );

        Ok(FetchedResource {
            status,
            final_url: response.url().clone(),
            content_type,
            class,
            response,
            body_timeout: self.timeout,
        })
    }
}

/// One upstream response, owned by the request that fetched it.
#[derive(Debug)]
pub struct FetchedResource {
    status: StatusCode,
    final_url: Url,
    content_type: Option<String>,
    class: ContentClass,
    response: reqwest::Response,
    body_timeout: Duration,
}

impl FetchedResource {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// URL after redirects; the base for rewriting.
    pub fn final_url(&self) -> &Url {
        &self.final_url
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn class(&self) -> ContentClass {
        self.class
    }

    /// Read the whole (decompressed) body.
    pub async fn bytes(self) -> Result<Bytes, FetchError> {
        match time::timeout(self.body_timeout, self.response.bytes()).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) => Err(FetchError::Body(e)),
            Err(_) => Err(FetchError::Timeout(self.body_timeout)),
        }
    }

    /// Body as a stream of chunks, with no overall deadline.
    pub fn into_stream(self) -> impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static {
        self.response.bytes_stream()
    }
}
