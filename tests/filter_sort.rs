use mailadmin::mail::types::{DATE_SENT, RECIPIENT, STATUS_CODE, TIME_SENT};
use mailadmin::mail::{Entry, SortKey, filter, parse_entries, sort_by, sort_by_label};

const LOG: &str = r#"[
    {"id": 1, "recipiant": "alice@Example.com", "subject_line": "Welcome",
     "date_sent": "2025-03-01", "time_sent": "09:15:00", "status_code": 200},
    {"id": 2, "recipiant": "bob@other.org", "subject_line": "Reset",
     "date_sent": "2025-03-02", "time_sent": "08:00:00", "status_code": "3"},
    {"id": 3, "recipiant": null, "subject_line": "Orphan",
     "date_sent": "2025-02-27", "time_sent": "23:59:59", "status_code": 500},
    {"id": 4, "recipiant": "carol@EXAMPLE.COM", "subject_line": "Digest",
     "date_sent": "2025-03-01", "time_sent": "17:45:00", "status_code": 3}
]"#;

fn ids(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.field("id").unwrap_or("")).collect()
}

fn visible_ids<'a>(entries: &'a [Entry], visible: &[bool]) -> Vec<&'a str> {
    entries
        .iter()
        .zip(visible)
        .filter(|(_, v)| **v)
        .map(|(e, _)| e.field("id").unwrap_or(""))
        .collect()
}

#[test]
fn blank_query_shows_everything() {
    let entries = parse_entries(LOG).unwrap();
    assert_eq!(filter("", &entries), vec![true; 4]);
    assert_eq!(filter(" \t ", &entries), vec![true; 4]);
}

#[test]
fn exact_status_query() {
    let entries = parse_entries(LOG).unwrap();
    let visible = filter(r#"status_code:"3""#, &entries);
    assert_eq!(visible_ids(&entries, &visible), vec!["2", "4"]);
}

#[test]
fn includes_query_ignores_case() {
    let entries = parse_entries(LOG).unwrap();
    let visible = filter(r#"recipiant:"INCLUDES:example.com""#, &entries);
    assert_eq!(visible_ids(&entries, &visible), vec!["1", "4"]);

    let visible = filter(r#"recipiant:"includes:EXAMPLE""#, &entries);
    assert_eq!(visible_ids(&entries, &visible), vec!["1", "4"]);
}

#[test]
fn null_recipient_matches_empty_value() {
    let entries = parse_entries(LOG).unwrap();
    let visible = filter("recipiant:", &entries);
    assert_eq!(visible_ids(&entries, &visible), vec!["3"]);
}

#[test]
fn unknown_field_exact_hides_all_includes_empty_shows_all() {
    let entries = parse_entries(LOG).unwrap();
    assert_eq!(filter("nope:x", &entries), vec![false; 4]);
    assert_eq!(filter("nope:INCLUDES", &entries), vec![true; 4]);
}

#[test]
fn newest_then_oldest_reverses() {
    let entries = parse_entries(LOG).unwrap();
    let newest = sort_by(SortKey::Newest, entries);
    assert_eq!(ids(&newest), vec!["2", "4", "1", "3"]);

    let oldest = sort_by(SortKey::Oldest, newest);
    assert_eq!(ids(&oldest), vec!["3", "1", "4", "2"]);
}

#[test]
fn status_sort_is_ascending_and_stable() {
    let entries = parse_entries(LOG).unwrap();
    let sorted = sort_by(SortKey::EmailStatus, entries);
    assert_eq!(ids(&sorted), vec!["2", "4", "1", "3"]);
}

#[test]
fn unparseable_values_sort_last() {
    let entries = vec![
        Entry::new()
            .with_field("id", "a")
            .with_field(STATUS_CODE, "pending")
            .with_field(DATE_SENT, "soon"),
        Entry::new()
            .with_field("id", "b")
            .with_field(STATUS_CODE, "250")
            .with_field(DATE_SENT, "2024-01-01")
            .with_field(TIME_SENT, "10:00"),
        Entry::new()
            .with_field("id", "c")
            .with_field(RECIPIENT, "x@example.com"),
    ];

    let by_status = sort_by(SortKey::EmailStatus, entries.clone());
    assert_eq!(ids(&by_status), vec!["b", "a", "c"]);

    let newest = sort_by(SortKey::Newest, entries.clone());
    assert_eq!(ids(&newest), vec!["b", "a", "c"]);
    let oldest = sort_by(SortKey::Oldest, entries);
    assert_eq!(ids(&oldest), vec!["b", "a", "c"]);
}

#[test]
fn sort_labels() {
    let entries = parse_entries(LOG).unwrap();
    let sorted = sort_by_label("Email Status", entries.clone());
    assert_eq!(ids(&sorted), vec!["2", "4", "1", "3"]);

    let unchanged = sort_by_label("Alphabetical", entries);
    assert_eq!(ids(&unchanged), vec!["1", "2", "3", "4"]);

    assert!(sort_by(SortKey::Newest, Vec::new()).is_empty());
}
