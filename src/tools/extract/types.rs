use serde::{Deserialize, Serialize};

use scraper::Html;

/// Selector chains and keyword lists the field extractor walks, in priority order.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractConfig {
    pub title_selectors: Vec<String>,
    pub shop_selectors: Vec<String>,
    pub price_selectors: Vec<String>,
    pub description_selectors: Vec<String>,
    /// Region names matched by plain containment when no origin label is present.
    pub region_keywords: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            title_selectors: owned(&["h1", "h2", "div.product-title", ".goods-title", ".detail-title"]),
            shop_selectors: owned(&[".shop-name", ".seller-name", ".merchant-name", ".store-name"]),
            price_selectors: owned(&[".price", ".current-price", ".goods-price", ".p-price"]),
            description_selectors: owned(&[".description", ".goods-desc", ".product-desc", ".detail-desc"]),
            region_keywords: owned(&["新疆"]),
        }
    }
}

/// Fields recovered from one detail page. `None` means every strategy missed.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub shop_name: Option<String>,
    pub price: Option<f64>,
    pub origin: Option<String>,
    pub description: Option<String>,
}

/// Read-only snapshot a strategy inspects: parsed DOM plus rendered body text.
pub struct PageView<'a> {
    pub doc: &'a Html,
    pub body_text: &'a str,
}

/// One way of recovering a field; `None` hands over to the next strategy.
pub type Strategy<'c, T> = Box<dyn Fn(&PageView<'_>) -> Option<T> + 'c>;

/// Box a closure as a [`Strategy`], letting the `Fn` bound drive inference.
pub fn strategy<'c, T, F>(f: F) -> Strategy<'c, T>
where
    F: Fn(&PageView<'_>) -> Option<T> + 'c,
{
    Box::new(f)
}
