use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use url::Url;

use crate::selectors::{LINK_SELECTOR, SCRIPT_SELECTOR};

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"'\\<>]+"#).expect("valid regex"));

/// Whether a URL carries any of the detail-page markers.
pub(super) fn is_candidate(url: &str, patterns: &[String]) -> bool {
    !url.is_empty() && patterns.iter().any(|p| url.contains(p.as_str()))
}

/// Undo the JSON escaping that hides URLs inside serialized page state.
pub(super) fn unescape_script(body: &str) -> String {
    body.replace("\\u002F", "/")
        .replace("\\u002f", "/")
        .replace("\\u0026", "&")
        .replace("\\/", "/")
}

/// Every URL-looking token inside a script body, in order.
pub(super) fn script_urls(body: &str) -> Vec<String> {
    let text = unescape_script(body);
    URL_REGEX
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Absolute http(s) hrefs of every anchor, in document order.
pub(super) fn page_anchors(doc: &Html, page_url: &str) -> Vec<String> {
    let base = Url::parse(page_url).ok();
    doc.select(&LINK_SELECTOR)
        .filter_map(|link| {
            let href = link
                .value()
                .attr("href")?
                .trim()
                .trim_matches('"')
                .trim_matches('\'')
                .trim();
            resolve_href(href, base.as_ref())
        })
        .collect()
}

fn resolve_href(href: &str, base: Option<&Url>) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(_) => base?.join(href).ok()?,
    };
    if matches!(url.scheme(), "http" | "https") {
        Some(url.to_string())
    } else {
        None
    }
}

/// Text of every inline `<script>`.
pub(super) fn inline_scripts(doc: &Html) -> Vec<String> {
    doc.select(&SCRIPT_SELECTOR)
        .map(|el| el.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
        .collect()
}
