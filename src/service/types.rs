use serde_json::Value;

/// Raw HTTP reply from the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

/// Render a reply for display: JSON bodies are pretty-printed, anything
/// else is shown verbatim.
pub fn render_reply(reply: &Reply) -> String {
    let body = match serde_json::from_str::<Value>(&reply.body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| reply.body.clone()),
        Err(_) => reply.body.clone(),
    };
    format!("HTTP {}\n\n{}", reply.status, body)
}
