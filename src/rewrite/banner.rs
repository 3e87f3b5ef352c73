//! Status banner injected at the top of every rewritten document.

use std::borrow::Cow;

/// `id` attribute of the banner element.
pub const BANNER_ID: &str = "rewriting-proxy-banner";

/// Attribute marking elements the proxy inserted itself.
pub const MARKER_ATTRIBUTE: &str = "data-rewriting-proxy";

const STYLE: &str = "all:initial;display:block;position:relative;z-index:2147483647;\
padding:6px 10px;background:#111;color:#eee;font:13px system-ui,sans-serif";

/// Render the banner showing the active referrer and a link to the landing page.
pub fn render(referrer: &str) -> String {
    let shown = if referrer.is_empty() {
        Cow::Borrowed("<em>none</em>")
    } else {
        Cow::Owned(format!("<code>{}</code>", escape_html(referrer)))
    };

    format!(
        r#"<div id="{BANNER_ID}" {MARKER_ATTRIBUTE} style="{STYLE}">Proxied &middot; Referer: {shown} &middot; <a href="/" {MARKER_ATTRIBUTE} style="color:#8cf">Open another site</a></div>"#
    )
}

/// Escape text for use in element content or a quoted attribute.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
