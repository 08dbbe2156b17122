//! Field Extractor
//!
//! Every field is recovered by an ordered chain of strategies; the first
//! strategy that yields a value wins. Nothing here fails: a field no
//! strategy can recover comes back as `None`.

pub mod types;
mod utils;

pub use types::*;
use utils::*;

use scraper::Html;

/// Extract title, shop name, price, origin and description from a rendered page.
///
/// `html` is the serialized DOM and `body_text` the rendered text of `<body>`
/// (what a user would see). Labeled-field regexes and the price fallback scan
/// `body_text`; selectors run against `html`.
pub fn extract(html: &str, body_text: &str, cfg: &ExtractConfig) -> ExtractedFields {
    let doc = Html::parse_document(html);
    let view = PageView {
        doc: &doc,
        body_text,
    };

    ExtractedFields {
        title: first_match(&view, &title_chain(cfg)),
        shop_name: first_match(&view, &shop_chain(cfg)),
        price: first_match(&view, &price_chain(cfg)),
        origin: first_match(&view, &origin_chain(cfg)),
        description: first_match(&view, &description_chain(cfg)),
    }
}

/// Title selectors, then the document `<title>`.
pub fn title_chain(cfg: &ExtractConfig) -> Vec<Strategy<'_, String>> {
    let mut chain = selector_chain(&cfg.title_selectors);
    chain.push(strategy(|view| document_title(view.doc)));
    chain
}

pub fn shop_chain(cfg: &ExtractConfig) -> Vec<Strategy<'_, String>> {
    selector_chain(&cfg.shop_selectors)
}

/// Price inside each price selector's element, then anywhere in the body text.
pub fn price_chain(cfg: &ExtractConfig) -> Vec<Strategy<'_, f64>> {
    let mut chain: Vec<Strategy<'_, f64>> = cfg
        .price_selectors
        .iter()
        .map(|sel| {
            strategy(move |view| select_text(view.doc, sel).and_then(|text| price_from_text(&text)))
        })
        .collect();
    chain.push(strategy(|view| price_from_text(view.body_text)));
    chain
}

/// Labeled origin fields in priority order, then a plain region mention.
pub fn origin_chain(cfg: &ExtractConfig) -> Vec<Strategy<'_, String>> {
    let mut chain: Vec<Strategy<'_, String>> = (0..origin_label_count())
        .map(|idx| strategy(move |view| labeled_origin(view.body_text, idx)))
        .collect();
    chain.push(strategy(move |view| {
        region_mention(view.body_text, &cfg.region_keywords)
    }));
    chain
}

/// Description selectors, then the meta description.
pub fn description_chain(cfg: &ExtractConfig) -> Vec<Strategy<'_, String>> {
    let mut chain = selector_chain(&cfg.description_selectors);
    chain.push(strategy(|view| meta_description(view.doc)));
    chain
}

fn selector_chain(selectors: &[String]) -> Vec<Strategy<'_, String>> {
    selectors
        .iter()
        .map(|sel| strategy(move |view| select_text(view.doc, sel)))
        .collect()
}
