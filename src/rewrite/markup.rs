//! HTML document rewriting.
//!
//! # Responsibilities
//! - Decode fetched bytes using the declared charset
//! - Point link and resource attributes back at the proxy
//! - Resolve against the document's `<base href>` when it has one, and strip it
//! - Default method-less forms to GET
//! - Prepend the status banner to `<body>`
//!
//! # Design Decisions
//! - lol_html rewrites while streaming, so broken or partial markup never
//!   aborts the pass and untouched bytes are emitted as they arrived
//! - Inline scripts and styles are not inspected

use std::borrow::Cow;
use std::cell::{Cell, RefCell};

use encoding_rs::{Encoding, UTF_8};
use lol_html::html_content::{ContentType, Element};
use lol_html::{element, rewrite_str, HandlerResult, RewriteStrSettings};
use url::Url;

use crate::rewrite::{banner, link, resolver, RewriteError};

/// Selector and attribute pairs that carry navigable or loadable URLs.
pub const LINK_ATTRIBUTES: &[(&str, &str)] = &[
    ("a[href]", "href"),
    ("area[href]", "href"),
    ("link[href]", "href"),
    ("img[src]", "src"),
    ("script[src]", "src"),
    ("frame[src]", "src"),
    ("iframe[src]", "src"),
    ("form[action]", "action"),
];

/// Per-document rewrite parameters.
#[derive(Debug, Clone, Copy)]
pub struct RewriteContext<'a> {
    base: &'a Url,
    referrer: &'a str,
    banner: bool,
}

impl<'a> RewriteContext<'a> {
    /// `base` is the effective URL of the document (after redirects).
    pub fn new(base: &'a Url, referrer: &'a str) -> Self {
        Self {
            base,
            referrer,
            banner: true,
        }
    }

    #[must_use]
    pub fn with_banner(mut self, banner: bool) -> Self {
        self.banner = banner;
        self
    }

    pub fn base(&self) -> &Url {
        self.base
    }

    pub fn referrer(&self) -> &str {
        self.referrer
    }
}

/// Decode markup bytes to text.
///
/// A BOM wins, then the `charset` parameter of `content_type`, then UTF-8.
/// Invalid sequences become U+FFFD.
pub fn decode_document<'b>(bytes: &'b [u8], content_type: Option<&str>) -> Cow<'b, str> {
    let encoding = content_type
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .and_then(|mime| {
            mime.get_param(mime::CHARSET)
                .and_then(|charset| Encoding::for_label(charset.as_str().as_bytes()))
        })
        .unwrap_or(UTF_8);

    let (text, _, _) = encoding.decode(bytes);
    text
}

/// Rewrite one document. The result is always UTF-8.
pub fn rewrite_document(markup: &str, ctx: &RewriteContext<'_>) -> Result<String, RewriteError> {
    let banner_markup = banner::render(ctx.referrer);
    let banner_done = Cell::new(!ctx.banner);
    // The first `<base href>` replaces the document URL for every link after it.
    let base = RefCell::new(ctx.base.clone());
    let base_seen = Cell::new(false);
    let current_base = &base;

    let mut element_content_handlers = Vec::with_capacity(LINK_ATTRIBUTES.len() + 3);
    element_content_handlers.push(element!("base[href]", |el| {
        if !base_seen.replace(true) {
            if let Some(raw) = el.get_attribute("href") {
                if let Ok(resolved) = resolver::resolve(ctx.base, &decode_attribute(&raw)) {
                    *base.borrow_mut() = resolved;
                }
            }
        }
        // Left in place the browser would resolve `/proxy?..` against the origin.
        el.remove_attribute("href");
        Ok(())
    }));

    for &(selector, attribute) in LINK_ATTRIBUTES {
        element_content_handlers.push(element!(selector, move |el| {
            let base = current_base.borrow();
            rewrite_attribute(el, attribute, &base, ctx.referrer)
        }));
    }

    // POST bodies are not relayed.
    element_content_handlers.push(element!("form", |el| {
        if !el.has_attribute("method") {
            el.set_attribute("method", "get")?;
        }
        Ok(())
    }));

    element_content_handlers.push(element!("body", |el| {
        if !banner_done.replace(true) {
            el.prepend(&banner_markup, ContentType::Html);
        }
        Ok(())
    }));

    let mut output = rewrite_str(
        markup,
        RewriteStrSettings {
            element_content_handlers,
            ..RewriteStrSettings::default()
        },
    )?;

    if !banner_done.get() {
        output.push_str(&banner_markup);
    }

    Ok(output)
}

fn rewrite_attribute(
    el: &mut Element<'_, '_>,
    attribute: &str,
    base: &Url,
    referrer: &str,
) -> HandlerResult {
    if el.has_attribute(banner::MARKER_ATTRIBUTE) {
        return Ok(());
    }
    let Some(raw) = el.get_attribute(attribute) else {
        return Ok(());
    };

    let value = decode_attribute(&raw);
    if value.trim().is_empty() || link::is_proxy_href(&value) {
        return Ok(());
    }

    match resolver::resolve(base, &value) {
        Ok(target) => {
            el.set_attribute(attribute, &link::proxy_href(target.as_str(), referrer))?;
        }
        Err(reason) => {
            tracing::trace!(
                tag = %el.tag_name(),
                attribute,
                value = %value,
                reason = %reason,
                "Leaving attribute untouched"
            );
        }
    }

    Ok(())
}

/// Resolve named and numeric character references in a raw attribute value.
fn decode_attribute(raw: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(raw)
}
