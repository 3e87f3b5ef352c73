//! Errors surfaced at the HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::fetch::{FetchError, InvalidRequest};

/// Everything a handler can fail with. The display text is the response body.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Missing url param.")]
    MissingUrl,

    #[error("Invalid URL.")]
    InvalidUrl(#[source] InvalidRequest),

    #[error("Invalid referrer.")]
    InvalidReferrer,

    #[error("Missing url or referrer.")]
    MissingFormField,

    #[error("Error fetching target site.")]
    Upstream(#[from] FetchError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingUrl
            | ProxyError::InvalidUrl(_)
            | ProxyError::InvalidReferrer
            | ProxyError::MissingFormField => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<InvalidRequest> for ProxyError {
    fn from(error: InvalidRequest) -> Self {
        match error {
            InvalidRequest::Referrer => ProxyError::InvalidReferrer,
            other => ProxyError::InvalidUrl(other),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
