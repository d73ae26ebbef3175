use std::time::Duration;

use anyhow::{Result, bail};
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info};

use super::types::Reply;
use crate::config::ServiceConfig;
use crate::mail::{Entry, entries_from_value};

/// Outbound side of the test email form
pub trait Transport {
    fn post_json(&self, path: &str, body: &Value) -> Result<Reply>;
}

/// Blocking HTTP client for the email service
pub struct ServiceClient {
    http: Client,
    base_url: String,
    logs_path: String,
}

impl ServiceClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            logs_path: config.logs_path.clone(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// `GET /ping`, returning the response text
    pub fn ping(&self) -> Result<String> {
        let resp = self.http.get(self.url("/ping")).send()?;
        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            bail!("ping failed: HTTP {} {}", status.as_u16(), text.trim());
        }
        Ok(text)
    }

    /// Fetch the email log list
    pub fn fetch_entries(&self) -> Result<Vec<Entry>> {
        let url = self.url(&self.logs_path);
        debug!("fetching entries from {}", url);
        let value: Value = self.http.get(&url).send()?.error_for_status()?.json()?;
        let entries = entries_from_value(&value)?;
        info!(count = entries.len(), "fetched entries from service");
        Ok(entries)
    }
}

impl Transport for ServiceClient {
    fn post_json(&self, path: &str, body: &Value) -> Result<Reply> {
        let url = self.url(path);
        debug!("POST {}", url);
        let resp = self.http.post(&url).json(body).send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(Reply { status, body })
    }
}

/// Stand-in transport when no HTTP client could be built. Every request
/// fails with the stored reason.
pub struct Offline(pub String);

impl Transport for Offline {
    fn post_json(&self, _path: &str, _body: &Value) -> Result<Reply> {
        bail!("{}", self.0)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_without_double_slashes() {
        assert_eq!(join_url("http://h:1/", "/ping"), "http://h:1/ping");
        assert_eq!(join_url("http://h:1", "ping"), "http://h:1/ping");
        assert_eq!(join_url("http://h:1/api", "/email-logs"), "http://h:1/api/email-logs");
    }
}
