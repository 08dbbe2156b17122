use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use super::types::{PageView, Strategy};
use crate::selectors::{META_DESCRIPTION_SELECTOR, TITLE_SELECTOR};
use crate::tools::clean::clean_text;

// Currency symbol first, then "<amount> 元".
static PRICE_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"[¥￥]\s*([0-9]+(?:\.[0-9]{1,2})?)").expect("valid regex"),
        Regex::new(r"([0-9]+(?:\.[0-9]{1,2})?)\s*元").expect("valid regex"),
    ]
});

// 产地 / 发货地 / 原产地, value runs to the next newline or CJK punctuation.
static ORIGIN_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"产地[:：]\s*([^\n，。;；]+)").expect("valid regex"),
        Regex::new(r"发货地[:：]\s*([^\n，。;；]+)").expect("valid regex"),
        Regex::new(r"原产地[:：]\s*([^\n，。;；]+)").expect("valid regex"),
    ]
});

/// Run strategies in order and keep the first hit.
pub(super) fn first_match<T>(view: &PageView<'_>, chain: &[Strategy<'_, T>]) -> Option<T> {
    chain.iter().find_map(|strategy| strategy(view))
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Cleaned text of the first element matching `selector`.
pub(super) fn select_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let el = doc.select(&sel).next()?;
    non_empty(clean_text(&el.text().collect::<String>()))
}

pub(super) fn document_title(doc: &Html) -> Option<String> {
    let el = doc.select(&TITLE_SELECTOR).next()?;
    non_empty(clean_text(&el.text().collect::<String>()))
}

pub(super) fn meta_description(doc: &Html) -> Option<String> {
    doc.select(&META_DESCRIPTION_SELECTOR)
        .filter_map(|el| el.value().attr("content"))
        .find_map(|content| non_empty(clean_text(content)))
}

/// First amount any price pattern yields, patterns tried in order.
///
/// A match that does not parse to a finite number is skipped, not fatal.
pub(super) fn price_from_text(text: &str) -> Option<f64> {
    PRICE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .find(|price| price.is_finite())
    })
}

/// Value of the `index`-th labeled origin field, trimmed.
pub(super) fn labeled_origin(text: &str, index: usize) -> Option<String> {
    let cap = ORIGIN_PATTERNS.get(index)?.captures(text)?;
    non_empty(cap.get(1)?.as_str().trim().to_string())
}

pub(super) fn origin_label_count() -> usize {
    ORIGIN_PATTERNS.len()
}

/// First region keyword the text mentions.
pub(super) fn region_mention(text: &str, keywords: &[String]) -> Option<String> {
    keywords
        .iter()
        .find(|kw| !kw.is_empty() && text.contains(kw.as_str()))
        .cloned()
}
