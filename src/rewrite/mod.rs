//! Markup rewriting subsystem.
//!
//! # Data Flow
//! ```text
//! fetched markup bytes
//!     → markup.rs (charset decode, lol_html streaming rewrite)
//!         → resolver.rs (attribute value → absolute URL, or Unresolvable)
//!         → link.rs (absolute URL + referrer → /proxy?url=..&ref=..)
//!     → banner.rs (status banner prepended to <body>)
//!     → UTF-8 document text
//! ```
//!
//! # Design Decisions
//! - Attributes that cannot be resolved are left exactly as they were
//! - One encoding routine builds every proxy link, for the rewriter and the router alike
//! - Values already in proxy form are skipped, so rewriting is idempotent

pub mod banner;
pub mod link;
pub mod markup;
pub mod resolver;

use thiserror::Error;

pub use link::{proxy_href, PROXY_PATH};
pub use markup::{decode_document, rewrite_document, RewriteContext};
pub use resolver::{resolve, Unresolvable};

/// Failure of a rewrite pass. The caller falls back to passing the raw bytes through.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("markup rewriting failed: {0}")]
    Rewriting(#[from] lol_html::errors::RewritingError),

    #[error("rewrite task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}
