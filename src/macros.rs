//! Shared Macros

/// Deduplicate a collection while preserving first-seen order.
#[macro_export]
macro_rules! dedupe {
    // Deduplication
    ($list:expr) => {{
        let mut seen = std::collections::HashSet::new();
        let mut result = Vec::new();
        for item in $list {
            if seen.insert(item.clone()) {
                result.push(item);
            }
        }
        result
    }};
    // Deduplication, stopping once `limit` unique items are collected
    ($list:expr, limit = $limit:expr) => {{
        let limit: usize = $limit;
        let mut seen = std::collections::HashSet::new();
        let mut result = Vec::new();
        for item in $list {
            if result.len() >= limit {
                break;
            }
            if seen.insert(item.clone()) {
                result.push(item);
            }
        }
        result
    }};
}
