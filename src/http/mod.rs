//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, timeout, body limit)
//!     → handlers.rs (landing page, /open redirect, /proxy)
//!         → fetch engine (outbound GET)
//!     → response.rs (rewrite markup or stream opaque bytes)
//!     → Send to client
//! ```
//!
//! Per request: `Received → Validated → Fetched → {Rewritten | Passthrough} → Responded`,
//! with `Rejected` and `FetchFailed` short-circuiting to an error response.

pub mod handlers;
pub mod landing;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{build_router, AppState, HttpServer};
