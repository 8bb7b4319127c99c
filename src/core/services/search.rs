//! Accent- and case-insensitive description search.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::domain::MonetaryRecord;

/// Decomposes, drops combining marks and lowercases: `"Café"` becomes `"cafe"`.
pub fn normalize_for_search(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Blank queries match everything.
pub fn matches_search(description: &str, query: &str) -> bool {
    let query = normalize_for_search(query.trim());
    query.is_empty() || normalize_for_search(description).contains(&query)
}

/// Keeps entries whose description matches `query`, preserving order.
pub fn filter_entries(entries: &[MonetaryRecord], query: &str) -> Vec<MonetaryRecord> {
    entries
        .iter()
        .filter(|entry| matches_search(&entry.description, query))
        .cloned()
        .collect()
}
