//! Validated proxy request.

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

/// Rejection of the caller's input before anything is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRequest {
    #[error("target URL does not parse: {0}")]
    Url(#[from] url::ParseError),

    #[error("target URL scheme `{0}` is not http or https")]
    UnsupportedScheme(String),

    #[error("target URL has no host")]
    MissingHost,

    #[error("referrer is not a valid header value")]
    Referrer,

    #[error("query string is unreadable: {0}")]
    Query(String),
}

/// A target to fetch and the referrer to present to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    target_url: Url,
    referrer: String,
}

impl ProxyRequest {
    /// Validate `target` as an absolute http(s) URL and `referrer` as a header value.
    pub fn new(target: &str, referrer: impl Into<String>) -> Result<Self, InvalidRequest> {
        let target_url = Url::parse(target.trim())?;
        if !matches!(target_url.scheme(), "http" | "https") {
            return Err(InvalidRequest::UnsupportedScheme(
                target_url.scheme().to_owned(),
            ));
        }
        if target_url.host_str().map_or(true, str::is_empty) {
            return Err(InvalidRequest::MissingHost);
        }

        let referrer = referrer.into();
        if HeaderValue::from_str(&referrer).is_err() {
            return Err(InvalidRequest::Referrer);
        }

        Ok(Self {
            target_url,
            referrer,
        })
    }

    pub fn target_url(&self) -> &Url {
        &self.target_url
    }

    /// Referrer to send upstream; empty means none.
    pub fn referrer(&self) -> &str {
        &self.referrer
    }
}
