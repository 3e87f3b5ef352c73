//! Proxy link encoding.
//!
//! Both the markup rewriter and the `/open` redirect build their links here,
//! so a target always encodes to the same `/proxy?url=..&ref=..` form.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Path of the proxy endpoint.
pub const PROXY_PATH: &str = "/proxy";

/// Characters left unescaped in a query parameter value, same set as
/// `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the proxy-relative link for `target`, carrying `referrer`.
pub fn proxy_href(target: &str, referrer: &str) -> String {
    format!(
        "{PROXY_PATH}?url={}&ref={}",
        utf8_percent_encode(target, COMPONENT),
        utf8_percent_encode(referrer, COMPONENT)
    )
}

/// Whether `value` already points at the proxy endpoint.
pub fn is_proxy_href(value: &str) -> bool {
    value
        .trim_start()
        .strip_prefix(PROXY_PATH)
        .is_some_and(|rest| rest.starts_with('?'))
}
