//! Clean Tools

mod utils;

use utils::*;

/// Clean text pulled out of a rendered element.
///
/// Performs the following operations in order:
/// 1. Remove zero-width characters
/// 2. Remove control characters (newlines/tabs survive as whitespace)
/// 3. Normalize whitespace (collapse runs, trim)
///
/// # Examples
/// ```
/// use prowl::tools::clean::clean_text;
///
/// assert_eq!(clean_text("  新疆\u{200B}核桃 \n\t 500g "), "新疆核桃 500g");
/// ```
pub fn clean_text(text: &str) -> String {
    let result = remove_zero_width_chars(text);
    let result = remove_control_chars(&result);
    normalize_whitespace(&result)
}

/// Fold text for comparison.
///
/// NFKC compatibility folding turns full-width forms (`５００Ｇ`, `　`) into
/// their ASCII counterparts, then the result is lowercased and cleaned.
///
/// # Examples
/// ```
/// use prowl::tools::clean::fold_text;
///
/// assert_eq!(fold_text("新疆核桃　５００Ｇ"), "新疆核桃 500g");
/// ```
pub fn fold_text(text: &str) -> String {
    clean_text(&normalize_compat(text).to_lowercase())
}

/// Keep at most `max_chars` characters (never splits a code point).
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
