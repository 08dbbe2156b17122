use super::types::{AnalysisConfig, RegionRule};
use crate::types::RawItemRecord;

/// Derived per-record features, before grouping.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Features {
    pub desc_len: usize,
    pub keyword_flags: Vec<(String, bool)>,
    pub origin: String,
}

/// Text the features are computed from: the description, empty when absent.
pub(super) fn analysis_text(record: &RawItemRecord) -> &str {
    record.description.as_deref().unwrap_or("")
}

pub(super) fn features(record: &RawItemRecord, cfg: &AnalysisConfig) -> Features {
    let text = analysis_text(record);
    Features {
        desc_len: text.chars().count(),
        keyword_flags: cfg
            .keywords
            .iter()
            .map(|kw| (kw.clone(), !kw.is_empty() && text.contains(kw.as_str())))
            .collect(),
        origin: normalize_origin(&record.origin, text, &cfg.region_rules),
    }
}

/// Trimmed origin, else the first region rule the text triggers, else empty.
pub(super) fn normalize_origin(origin: &str, text: &str, rules: &[RegionRule]) -> String {
    let origin = origin.trim();
    if !origin.is_empty() {
        return origin.to_string();
    }
    rules
        .iter()
        .find(|rule| !rule.keyword.is_empty() && text.contains(rule.keyword.as_str()))
        .map(|rule| rule.region.clone())
        .unwrap_or_default()
}
