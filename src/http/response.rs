//! Response construction for proxied content.
//!
//! # Responsibilities
//! - Rewrite markup off the async workers and return it as UTF-8 HTML
//! - Stream opaque bodies through unchanged
//! - Fall back to the raw bytes when a rewrite fails
//!
//! # Design Decisions
//! - Rewritten markup is always served as 200; opaque bodies and the raw
//!   fallback keep the upstream status
//! - Only the content type is taken from upstream headers; framing and
//!   frame-blocking headers (X-Frame-Options, CSP) are not forwarded

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use url::Url;

use crate::fetch::classify::OCTET_STREAM;
use crate::fetch::{infer_content_type, FetchError, FetchedResource};
use crate::observability::metrics;
use crate::rewrite::{decode_document, rewrite_document, RewriteContext, RewriteError};

/// Content type of every rewritten document.
pub const HTML_UTF8: &str = "text/html; charset=utf-8";

/// Stream an opaque resource to the client.
pub fn passthrough(resource: FetchedResource) -> Response {
    let status = resource.status();
    let content_type = infer_content_type(resource.content_type(), resource.final_url());
    with_content_type(status, &content_type, Body::from_stream(resource.into_stream()))
}

/// Relay an already-buffered body unchanged.
pub fn passthrough_buffered(
    status: StatusCode,
    content_type: Option<&str>,
    url: &Url,
    body: Bytes,
) -> Response {
    let content_type = infer_content_type(content_type, url);
    with_content_type(status, &content_type, Body::from(body))
}

/// Read a markup resource, rewrite it, and build the response.
///
/// Only reading the body can fail; a failed rewrite degrades to passthrough
/// with the upstream status.
pub async fn render_markup(
    resource: FetchedResource,
    referrer: &str,
    banner: bool,
) -> Result<Response, FetchError> {
    let status = resource.status();
    let base = resource.final_url().clone();
    let content_type = resource.content_type().map(str::to_owned);
    let body = resource.bytes().await?;

    match rewrite_blocking(
        body.clone(),
        content_type.clone(),
        base.clone(),
        referrer.to_owned(),
        banner,
    )
    .await
    {
        Ok(html) => {
            metrics::record_rewrite("rewritten");
            Ok(with_content_type(StatusCode::OK, HTML_UTF8, Body::from(html)))
        }
        Err(e) => {
            tracing::warn!(
                base_url = %base,
                error = %e,
                "Markup rewrite failed, relaying original bytes"
            );
            metrics::record_rewrite("fallback");
            Ok(passthrough_buffered(status, content_type.as_deref(), &base, body))
        }
    }
}

async fn rewrite_blocking(
    body: Bytes,
    content_type: Option<String>,
    base: Url,
    referrer: String,
    banner: bool,
) -> Result<String, RewriteError> {
    tokio::task::spawn_blocking(move || {
        let text = decode_document(&body, content_type.as_deref());
        let ctx = RewriteContext::new(&base, &referrer).with_banner(banner);
        rewrite_document(&text, &ctx)
    })
    .await?
}

fn with_content_type(status: StatusCode, content_type: &str, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    let value = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(OCTET_STREAM));
    response.headers_mut().insert(CONTENT_TYPE, value);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_buffered_passthrough_keeps_bytes() {
        let url = Url::parse("https://example.test/blob").unwrap();
        let bytes = Bytes::from_static(&[0u8, 159, 146, 150, 255]);
        let response =
            passthrough_buffered(StatusCode::NOT_FOUND, Some("image/x-icon"), &url, bytes.clone());

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], "image/x-icon");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, bytes);
    }

    #[tokio::test]
    async fn test_buffered_passthrough_infers_type() {
        let url = Url::parse("https://example.test/app.css").unwrap();
        let response = passthrough_buffered(StatusCode::OK, None, &url, Bytes::new());
        assert_eq!(response.headers()[CONTENT_TYPE], "text/css");
    }

    #[tokio::test]
    async fn test_rewrite_blocking_runs_pass() {
        let html = rewrite_blocking(
            Bytes::from_static(b"<body><a href=\"/x\">x</a></body>"),
            Some("text/html".into()),
            Url::parse("https://example.test/").unwrap(),
            String::new(),
            false,
        )
        .await
        .unwrap();
        assert!(html.contains("/proxy?url=https%3A%2F%2Fexample.test%2Fx"));
    }
}
