//! Route handlers: landing page, `/open` and `/proxy`.

use std::time::Instant;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Form, Query, State};
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::error::ProxyError;
use crate::fetch::{ContentClass, InvalidRequest, ProxyRequest};
use crate::http::request::request_id;
use crate::http::response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::rewrite::proxy_href;

/// Query string of `GET /proxy`.
#[derive(Debug, Default, Deserialize)]
pub struct ProxyParams {
    pub url: Option<String>,
    #[serde(rename = "ref")]
    pub referrer: Option<String>,
}

/// Body of `POST /open`.
#[derive(Debug, Default, Deserialize)]
pub struct OpenForm {
    pub url: Option<String>,
    pub referrer: Option<String>,
}

pub async fn landing() -> Html<&'static str> {
    Html(super::landing::PAGE)
}

/// Redirect a submitted form to the matching `/proxy` link.
pub async fn open(Form(form): Form<OpenForm>) -> Result<Redirect, ProxyError> {
    let url = form
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or(ProxyError::MissingFormField)?;
    let referrer = form.referrer.ok_or(ProxyError::MissingFormField)?;

    let target = with_default_scheme(url);
    tracing::debug!(target_url = %target, referrer = %referrer, "Opening target");
    Ok(Redirect::to(&proxy_href(&target, referrer.trim())))
}

/// Fetch the target and return it rewritten or relayed.
pub async fn proxy(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ProxyParams>, QueryRejection>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let (response, outcome) = match proxy_inner(&state, &headers, query).await {
        Ok((response, class)) => {
            let outcome = match class {
                ContentClass::Markup => "rewritten",
                ContentClass::Opaque => "passthrough",
            };
            (response, outcome)
        }
        Err(e) => {
            match &e {
                ProxyError::Upstream(cause) => {
                    metrics::record_upstream_failure(cause.kind());
                }
                other => {
                    tracing::debug!(request_id = %request_id, error = %other, "Rejected proxy request");
                }
            }
            (e.into_response(), "error")
        }
    };

    metrics::record_request("proxy", response.status().as_u16(), outcome, start);
    response
}

async fn proxy_inner(
    state: &AppState,
    headers: &HeaderMap,
    query: Result<Query<ProxyParams>, QueryRejection>,
) -> Result<(Response, ContentClass), ProxyError> {
    let Query(params) =
        query.map_err(|rejection| InvalidRequest::Query(rejection.body_text()))?;
    let raw_url = params
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or(ProxyError::MissingUrl)?;
    let request = ProxyRequest::new(&raw_url, params.referrer.unwrap_or_default())?;
    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());

    tracing::debug!(
        request_id = %request_id(headers),
        target_url = %request.target_url(),
        referrer = %request.referrer(),
        "Proxying request"
    );

    let resource = state
        .fetcher
        .fetch(&request, user_agent)
        .await
        .map_err(|e| log_upstream_failure(headers, &request, e))?;
    let class = resource.class();

    let response = match class {
        ContentClass::Markup => {
            response::render_markup(resource, request.referrer(), state.banner)
                .await
                .map_err(|e| log_upstream_failure(headers, &request, e))?
        }
        ContentClass::Opaque => response::passthrough(resource),
    };

    Ok((response, class))
}

fn log_upstream_failure(
    headers: &HeaderMap,
    request: &ProxyRequest,
    error: crate::fetch::FetchError,
) -> ProxyError {
    tracing::warn!(
        request_id = %request_id(headers),
        target_url = %request.target_url(),
        kind = error.kind(),
        error = %error,
        "Upstream fetch failed"
    );
    ProxyError::Upstream(error)
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found.")
}

/// Prefix `https://` unless the address already names http or https.
fn with_default_scheme(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_owned()
    } else {
        format!("https://{url}")
    }
}
