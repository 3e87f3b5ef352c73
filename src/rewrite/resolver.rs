//! Reference resolution against a document base URL.
//!
//! # Responsibilities
//! - Resolve absolute, scheme-relative, path-absolute, path-relative,
//!   query-only and fragment-only references
//! - Refuse references with a non-fetchable scheme (`javascript:`, `data:`,
//!   `mailto:`, ...) before handing them to the URL parser
//! - Report failures as a value, never a panic

use thiserror::Error;
use url::Url;

/// Why a reference was not turned into an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unresolvable {
    #[error("reference is empty")]
    Empty,

    #[error("scheme `{0}` is not fetched through the proxy")]
    Scheme(String),

    #[error("reference is malformed: {0}")]
    Malformed(#[from] url::ParseError),
}

/// Resolve `reference` against `base`.
///
/// Only `http` and `https` results count as resolved.
pub fn resolve(base: &Url, reference: &str) -> Result<Url, Unresolvable> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(Unresolvable::Empty);
    }

    if let Some(scheme) = explicit_scheme(reference) {
        if !is_fetchable_scheme(scheme) {
            return Err(Unresolvable::Scheme(scheme.to_ascii_lowercase()));
        }
    }

    let resolved = base.join(reference)?;
    // The parser strips tabs and newlines, so "java\tscript:" only shows its scheme here.
    if !is_fetchable_scheme(resolved.scheme()) {
        return Err(Unresolvable::Scheme(resolved.scheme().to_owned()));
    }

    Ok(resolved)
}

/// The scheme of `reference`, if it starts with one (`scheme ":"`).
pub fn explicit_scheme(reference: &str) -> Option<&str> {
    let colon = reference.find(':')?;
    let candidate = &reference[..colon];

    let mut chars = candidate.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(candidate)
    } else {
        None
    }
}

fn is_fetchable_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}
