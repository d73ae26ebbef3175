use super::query::{MatchMode, Query};
use super::types::Entry;

/// Text an entry is compared against for `field`.
///
/// Quotes are removed, whitespace trimmed and case folded. A missing field and
/// a field rendered as `null` both yield the empty string.
pub fn comparison_text(entry: &Entry, field: &str) -> String {
    let Some(raw) = entry.field(field) else {
        return String::new();
    };
    let text = raw.replace('"', "").trim().to_lowercase();
    if text == "null" { String::new() } else { text }
}

pub fn matches(query: &Query, entry: &Entry) -> bool {
    let text = comparison_text(entry, &query.field);
    match query.mode {
        MatchMode::Includes => text.contains(&query.value),
        MatchMode::Exact => text == query.value,
    }
}

/// Visibility of each entry for the raw query text, index-aligned with `entries`
pub fn filter(query_text: &str, entries: &[Entry]) -> Vec<bool> {
    match Query::parse(query_text) {
        Some(query) => entries.iter().map(|e| matches(&query, e)).collect(),
        None => vec![true; entries.len()],
    }
}
