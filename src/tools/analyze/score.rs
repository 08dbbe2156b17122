use super::types::AnalysisConfig;

/// `desc_len + weight * hits + bonus` when the origin names the preferred region.
pub(super) fn score(desc_len: usize, keyword_hits: usize, origin: &str, cfg: &AnalysisConfig) -> u64 {
    let region = &cfg.preferred_region;
    let bonus = if !region.is_empty() && origin.contains(region.as_str()) {
        cfg.region_bonus
    } else {
        0
    };
    (desc_len as u64)
        .saturating_add(cfg.keyword_weight.saturating_mul(keyword_hits as u64))
        .saturating_add(bonus)
}
