use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{debug, info};

use super::types::Entry;

/// Keys a wrapped list may sit under
const LIST_KEYS: &[&str] = &["emails", "logs", "entries"];

/// Parse entries from JSON: either a bare array of objects or an object
/// wrapping one under `emails`, `logs` or `entries`. Non-object items are skipped.
pub fn parse_entries(json: &str) -> Result<Vec<Entry>> {
    let value: Value = serde_json::from_str(json).context("entry list is not valid JSON")?;
    entries_from_value(&value)
}

pub fn entries_from_value(value: &Value) -> Result<Vec<Entry>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match LIST_KEYS.iter().find_map(|k| map.get(*k)) {
            Some(Value::Array(items)) => items,
            _ => bail!("expected a JSON array of email records"),
        },
        _ => bail!("expected a JSON array of email records"),
    };

    let entries: Vec<Entry> = items.iter().filter_map(Entry::from_json).collect();
    let skipped = items.len() - entries.len();
    if skipped > 0 {
        debug!(skipped, "ignored non-object items in entry list");
    }
    Ok(entries)
}

/// Load entries from a JSON file. `~` is expanded.
pub fn load_entries(path: &str) -> Result<Vec<Entry>> {
    let expanded = shellexpand::tilde(path);
    let path = Path::new(expanded.as_ref());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let entries = parse_entries(&content)?;
    info!(count = entries.len(), path = %path.display(), "loaded entries");
    Ok(entries)
}
