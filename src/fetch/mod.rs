//! Outbound fetch subsystem.
//!
//! # Data Flow
//! ```text
//! query params (url, ref)
//!     → request.rs (validate into ProxyRequest)
//!     → client.rs (GET with User-Agent + Referer, follow redirects, decompress)
//!     → classify.rs (markup | opaque by Content-Type)
//!     → FetchedResource handed to the response layer
//! ```
//!
//! # Design Decisions
//! - One attempt per request; failures are reported, never retried
//! - Transport errors are folded into `FetchError` so the router only sees 502-class failures
//! - Upstream status codes are passed along, not treated as errors (unless configured)

pub mod classify;
pub mod client;
pub mod request;

use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

pub use classify::{classify, infer_content_type, ContentClass};
pub use client::{FetchEngine, FetchedResource};
pub use request::{InvalidRequest, ProxyRequest};

/// Failure to obtain a usable response from the target.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("upstream connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("upstream responded with {0}")]
    Status(StatusCode),

    #[error("failed to read upstream body: {0}")]
    Body(#[source] reqwest::Error),
}

impl FetchError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Client(_) => "client",
            FetchError::Timeout(_) => "timeout",
            FetchError::Connect(_) => "connect",
            FetchError::Request(_) => "request",
            FetchError::Status(_) => "status",
            FetchError::Body(_) => "body",
        }
    }

    fn from_send(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            FetchError::Timeout(timeout)
        } else if error.is_connect() {
            FetchError::Connect(error)
        } else {
            FetchError::Request(error)
        }
    }
}
