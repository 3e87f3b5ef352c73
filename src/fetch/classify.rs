//! Response classification by content type.

use url::Url;

/// Fallback content type for bodies nothing is known about.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// How a fetched body is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentClass {
    /// HTML, rewritten before it is returned.
    Markup,
    /// Anything else, relayed byte for byte.
    Opaque,
}

/// Classify a declared `Content-Type`. Absent or unparseable types are opaque.
pub fn classify(content_type: Option<&str>) -> ContentClass {
    let Some(mime) = content_type.and_then(|value| value.parse::<mime::Mime>().ok()) else {
        return ContentClass::Opaque;
    };

    let essence = mime.essence_str();
    if essence.eq_ignore_ascii_case("text/html") || essence.eq_ignore_ascii_case("application/xhtml+xml") {
        ContentClass::Markup
    } else {
        ContentClass::Opaque
    }
}

/// Content type for a relayed body: the declared one, else a guess from the
/// URL path suffix, else [`OCTET_STREAM`].
pub fn infer_content_type(declared: Option<&str>, url: &Url) -> String {
    if let Some(declared) = declared.map(str::trim).filter(|value| !value.is_empty()) {
        return declared.to_owned();
    }

    mime_guess::from_path(url.path())
        .first()
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_owned())
}
