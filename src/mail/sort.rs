use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, warn};

use super::types::{DATE_SENT, Entry, STATUS_CODE, TIME_SENT};

/// Formats tried against "date time"
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Oldest,
    Newest,
    EmailStatus,
}

impl SortKey {
    /// Menu order
    pub const ALL: [SortKey; 3] = [SortKey::Oldest, SortKey::Newest, SortKey::EmailStatus];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Oldest => "Oldest",
            SortKey::Newest => "Newest",
            SortKey::EmailStatus => "Email Status",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sorting method: {0:?}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

/// Sent timestamp built from the date and time fields
pub fn timestamp(entry: &Entry) -> Option<NaiveDateTime> {
    let date = entry.field(DATE_SENT)?.replace('"', "");
    let time = entry
        .field(TIME_SENT)
        .map(|t| t.replace('"', ""))
        .unwrap_or_default();
    let date = date.trim();
    let joined = format!("{} {}", date, time.trim());
    let joined = joined.trim();

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(joined, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(date)
                .or_else(|_| DateTime::parse_from_rfc2822(date))
                .map(|dt| dt.naive_utc())
                .ok()
        })
        .or_else(|| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Leading integer of the status field (`"404 Not Found"` reads as 404)
pub fn status_code(entry: &Entry) -> Option<i64> {
    let raw = entry.field(STATUS_CODE)?.replace('"', "");
    let raw = raw.trim();
    let digits_start = usize::from(raw.starts_with(['+', '-']));
    let digits = raw[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(raw.len(), |i| digits_start + i);
    if digits == digits_start {
        return None;
    }
    raw[..digits].parse().ok()
}

/// Stable permutation of `entries` for `key`. Entries without a usable key
/// go last, in their current relative order.
pub fn sorted_indices(key: SortKey, entries: &[Entry]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    match key {
        SortKey::Newest | SortKey::Oldest => {
            let keys: Vec<Option<NaiveDateTime>> = entries.iter().map(timestamp).collect();
            let unparsed = keys.iter().filter(|k| k.is_none()).count();
            if unparsed > 0 {
                debug!(unparsed, "entries without a parseable sent timestamp");
            }
            order.sort_by(|&a, &b| {
                missing_last(keys[a], keys[b], |x, y| match key {
                    SortKey::Newest => y.cmp(x),
                    _ => x.cmp(y),
                })
            });
        }
        SortKey::EmailStatus => {
            let keys: Vec<Option<i64>> = entries.iter().map(status_code).collect();
            order.sort_by(|&a, &b| missing_last(keys[a], keys[b], |x, y| x.cmp(y)));
        }
    }
    order
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Reorder entries by `key`
pub fn sort_by(key: SortKey, entries: Vec<Entry>) -> Vec<Entry> {
    if entries.is_empty() {
        return entries;
    }
    let order = sorted_indices(key, &entries);
    let mut slots: Vec<Option<Entry>> = entries.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

/// Reorder entries by a menu label. Unknown labels log a warning and leave
/// the order untouched.
pub fn sort_by_label(label: &str, entries: Vec<Entry>) -> Vec<Entry> {
    match label.parse::<SortKey>() {
        Ok(key) => sort_by(key, entries),
        Err(e) => {
            warn!("{e}");
            entries
        }
    }
}
