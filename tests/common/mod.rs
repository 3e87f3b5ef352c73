//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{CONTENT_ENCODING, CONTENT_TYPE, LOCATION, REFERER, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use rewriting_proxy::config::ProxyConfig;
use rewriting_proxy::http::HttpServer;
use rewriting_proxy::lifecycle::Shutdown;

/// PNG signature followed by bytes that are not valid UTF-8.
pub const PNG: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, b'I', b'H', b'D',
    b'R', 0xff, 0xfe, 0x00, 0x80, 0xc3, 0x28, 0xa0, 0xa1, 0x00, 0x01,
];

pub const INDEX_HTML: &str = concat!(
    r#"<!doctype html><html><head><title>fixture</title>"#,
    r#"<link rel="stylesheet" href="style.css">"#,
    r#"<script src="//cdn.test/app.js"></script></head>"#,
    r#"<body><a href="/page2">next</a><img src="logo.png">"#,
    r#"<a href="mailto:owner@example.test">mail</a>"#,
    r#"<form action="search"><input name="q"></form></body></html>"#
);

async fn echo_headers(headers: HeaderMap) -> Html<String> {
    let value = |name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_owned()
    };
    Html(format!(
        "<body><p>referer={}</p><p>agent={}</p></body>",
        value(REFERER),
        value(USER_AGENT)
    ))
}

fn gzip(body: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body).unwrap();
    encoder.finish().unwrap()
}

fn zlib(body: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body).unwrap();
    encoder.finish().unwrap()
}

fn redirect_to(location: &'static str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

/// Start a mock target site on an ephemeral port.
pub async fn start_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/dir/", get(|| async { Html(INDEX_HTML) }))
        .route("/logo.png", get(|| async { ([(CONTENT_TYPE, "image/png")], PNG) }))
        .route(
            "/gone.png",
            get(|| async { (StatusCode::NOT_FOUND, [(CONTENT_TYPE, "image/png")], PNG) }),
        )
        .route(
            "/unavailable.bin",
            get(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    [(CONTENT_TYPE, "application/octet-stream")],
                    &b"retry later"[..],
                )
            }),
        )
        .route(
            "/gzip/",
            get(|| async {
                (
                    [(CONTENT_TYPE, "text/html"), (CONTENT_ENCODING, "gzip")],
                    gzip(INDEX_HTML.as_bytes()),
                )
            }),
        )
        .route(
            "/deflate/",
            get(|| async {
                (
                    [(CONTENT_TYPE, "text/html"), (CONTENT_ENCODING, "deflate")],
                    zlib(INDEX_HTML.as_bytes()),
                )
            }),
        )
        .route("/redirect", get(|| async { redirect_to("/dir/") }))
        .route("/headers", get(echo_headers))
        .route("/to-headers", get(|| async { redirect_to("/headers") }))
        .route(
            "/missing",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Html(r#"<body><a href="home">home</a></body>"#),
                )
            }),
        )
        .route(
            "/boom",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Html("<body>boom</body>")) }),
        )
        .route(
            "/files/report.pdf",
            get(|| async { Response::new(Body::from(&b"%PDF-1.4"[..])) }),
        )
        .route(
            "/download",
            get(|| async { Response::new(Body::from(&b"\x00\x01\x02"[..])) }),
        )
        .route(
            "/latin1",
            get(|| async {
                (
                    [(CONTENT_TYPE, "text/html; charset=iso-8859-1")],
                    &b"<body><p>caf\xe9</p></body>"[..],
                )
            }),
        )
        .route(
            "/framed",
            get(|| async {
                (
                    [
                        ("x-frame-options", "DENY"),
                        ("content-security-policy", "frame-ancestors 'none'"),
                    ],
                    Html("<body>framed</body>"),
                )
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Html("<body>late</body>")
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start a target that accepts connections and closes them without answering.
pub async fn start_hangup_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let _ = socket.shutdown().await;
        }
    });
    addr
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(mut config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that does not follow redirects or use environment proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// `/proxy` URL on `proxy` for `target`.
pub fn proxy_url(proxy: SocketAddr, target: &str, referrer: &str) -> String {
    format!(
        "http://{proxy}{}",
        rewriting_proxy::rewrite::proxy_href(target, referrer)
    )
}
