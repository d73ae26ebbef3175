use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field holding the recipient address list (spelled as the service renders it)
pub const RECIPIENT: &str = "recipiant";
pub const SUBJECT: &str = "subject_line";
pub const DATE_SENT: &str = "date_sent";
pub const TIME_SENT: &str = "time_sent";
pub const STATUS_CODE: &str = "status_code";

/// One email log record as displayed in the list.
///
/// Fields keep the order they arrived in so the details view matches the
/// source. Values are the rendered text, not the typed JSON value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entry {
    pub fields: Vec<(String, String)>,
}

impl Entry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by loaders and tests
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn set_field(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    /// Build an entry from a JSON object. Anything else is rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let fields = object
            .iter()
            .map(|(name, v)| (name.clone(), render_value(v)))
            .collect();
        Some(Self { fields })
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn recipient_display(&self) -> String {
        display_text(self.field(RECIPIENT)).unwrap_or_else(|| "(unknown)".to_string())
    }

    pub fn subject_display(&self) -> String {
        display_text(self.field(SUBJECT)).unwrap_or_else(|| "(no subject)".to_string())
    }

    /// "date time" as shown in the list column
    pub fn sent_display(&self) -> String {
        let date = display_text(self.field(DATE_SENT)).unwrap_or_default();
        let time = display_text(self.field(TIME_SENT)).unwrap_or_default();
        format!("{} {}", date, time).trim().to_string()
    }

    pub fn status_display(&self) -> String {
        display_text(self.field(STATUS_CODE)).unwrap_or_else(|| "-".to_string())
    }
}

/// Strip quotes and drop empty or `null` renderings
fn display_text(raw: Option<&str>) -> Option<String> {
    let text = raw?.replace('"', "");
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(text.to_string())
    }
}

/// Render a JSON value the way the list shows it
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
