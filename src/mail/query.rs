//! Filter query mini-language.
//!
//! ```text
//! field
//! field:"value"
//! field:"INCLUDES:value"
//! ```
//!
//! The first `:` separates the field name from the value. There is no escape
//! for a literal colon inside the value.

/// Marker switching a query to substring matching
pub const INCLUDES_MARKER: &str = "INCLUDES";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Comparison text must equal the value
    Exact,
    /// Comparison text must contain the value
    Includes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub field: String,
    /// Already lowercased
    pub value: String,
    pub mode: MatchMode,
}

impl Query {
    /// Parse a query. Returns `None` for blank input, which means "show everything".
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let (stripped, found_marker) = strip_marker(text);
        let mode = if found_marker {
            MatchMode::Includes
        } else {
            MatchMode::Exact
        };

        let (field, value) = match stripped.split_once(':') {
            Some((field, value)) => (field, Some(value)),
            None => (stripped.as_str(), None),
        };

        Some(Self {
            field: clean_segment(field),
            value: value
                .map(|v| clean_segment(v).to_lowercase())
                .unwrap_or_default(),
            mode,
        })
    }
}

fn clean_segment(segment: &str) -> String {
    segment.replace('"', "").trim().to_string()
}

/// Remove every case-insensitive occurrence of the marker, plus one colon
/// directly after it. Returns the remaining text and whether a marker was seen.
fn strip_marker(text: &str) -> (String, bool) {
    // ASCII lowercasing keeps byte offsets identical to the original
    let lower = text.to_ascii_lowercase();
    let marker = INCLUDES_MARKER.to_ascii_lowercase();

    let mut out = String::with_capacity(text.len());
    let mut found = false;
    let mut pos = 0;
    while let Some(rel) = lower[pos..].find(&marker) {
        let start = pos + rel;
        out.push_str(&text[pos..start]);
        found = true;
        pos = start + marker.len();
        if text[pos..].starts_with(':') {
            pos += 1;
        }
    }
    out.push_str(&text[pos..]);
    (out, found)
}
