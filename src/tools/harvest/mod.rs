//! Candidate Harvester
//!
//! Turns a rendered search page into an ordered, duplicate-free, capped list
//! of candidate detail-page URLs. Anchors are the first tier; inline scripts
//! are only scanned when no anchor qualifies.

mod utils;

use utils::*;

/// Link markers for product and shop detail pages on the default marketplace.
pub const DEFAULT_CANDIDATE_PATTERNS: &[&str] =
    &["/goods/", "/item/", "shop.douyin.com", "/product", "/goods"];

/// Harvest candidate URLs from anchor hrefs, falling back to script bodies.
///
/// Output preserves discovery order, holds no duplicates and never exceeds
/// `max_candidates`. When neither tier yields anything the result is empty.
pub fn harvest(
    anchors: &[String],
    scripts: &[String],
    max_candidates: usize,
    patterns: &[String],
) -> Vec<String> {
    let from_anchors: Vec<String> = crate::dedupe!(
        anchors
            .iter()
            .filter(|href| is_candidate(href, patterns))
            .cloned(),
        limit = max_candidates
    );
    if !from_anchors.is_empty() {
        tracing::debug!(count = from_anchors.len(), "candidates harvested from anchors");
        return from_anchors;
    }

    let from_scripts: Vec<String> = crate::dedupe!(
        scripts
            .iter()
            .flat_map(|body| script_urls(body))
            .filter(|url| is_candidate(url, patterns)),
        limit = max_candidates
    );
    tracing::debug!(count = from_scripts.len(), "candidates harvested from scripts");
    from_scripts
}

/// Harvest candidates straight from a rendered search page.
///
/// Relative hrefs are resolved against `page_url`; only http(s) links count.
pub fn harvest_page(
    html: &str,
    page_url: &str,
    max_candidates: usize,
    patterns: &[String],
) -> Vec<String> {
    let doc = scraper::Html::parse_document(html);
    let anchors = page_anchors(&doc, page_url);
    let scripts = inline_scripts(&doc);
    harvest(&anchors, &scripts, max_candidates, patterns)
}
