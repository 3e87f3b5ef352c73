//! Rewriting HTTP forward proxy.
//!
//! Fetches a caller-chosen URL with an injected `Referer`, rewrites the links
//! of HTML responses so navigation keeps flowing through the proxy, and
//! relays every other response body untouched.

pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rewrite;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
