use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::timezone::{Timezone, to_utc};
use crate::service::{Transport, render_reply};

/// Payload posted to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestEmailRequest {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub is_timed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to_send: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_send: Option<String>,
}

/// Reasons a submission is blocked before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Email body cannot be empty.")]
    EmptyBody,
    #[error("Recipient cannot be empty.")]
    MissingRecipient,
    #[error("Please choose a date and time to send the email.")]
    MissingSchedule,
    #[error("Invalid date {0:?}, expected YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("Invalid time {0:?}, expected HH:MM.")]
    InvalidTime(String),
    #[error("Unsupported timezone: {0}")]
    UnsupportedTimezone(String),
}

/// Source of the message body
pub trait BodyProvider {
    /// Plain text, used to reject empty bodies
    fn text(&self) -> String;
    /// Markup sent to the service
    fn html(&self) -> String;
}

/// Body written in the external editor. Blank-line separated blocks become
/// paragraphs, single newlines become `<br>`.
pub struct EditorBody<'a>(pub &'a str);

impl BodyProvider for EditorBody<'_> {
    fn text(&self) -> String {
        self.0.to_string()
    }

    fn html(&self) -> String {
        self.0
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                let lines: Vec<String> = p.lines().map(html_escape).collect();
                format!("<p>{}</p>", lines.join("<br>"))
            })
            .collect()
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestEmailForm {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub is_timed: bool,
    /// YYYY-MM-DD, local to `timezone`
    pub date: String,
    /// HH:MM, local to `timezone`
    pub time: String,
    pub timezone: String,
}

impl TestEmailForm {
    pub fn build_request(&self) -> Result<TestEmailRequest, FormError> {
        self.build_request_with(&EditorBody(&self.body))
    }

    /// Validate the form and build the payload. The body is checked first so
    /// an empty message is rejected whatever else is filled in.
    pub fn build_request_with(
        &self,
        body: &dyn BodyProvider,
    ) -> Result<TestEmailRequest, FormError> {
        if body.text().trim().is_empty() {
            return Err(FormError::EmptyBody);
        }
        let recipient = self.recipient.trim();
        if recipient.is_empty() {
            return Err(FormError::MissingRecipient);
        }

        let (date_to_send, time_to_send) = if self.is_timed {
            let (date, time) = self.schedule_utc()?;
            (Some(date), Some(time))
        } else {
            (None, None)
        };

        Ok(TestEmailRequest {
            recipient: recipient.to_string(),
            subject: self.subject.trim().to_string(),
            body: body.html(),
            is_timed: self.is_timed,
            date_to_send,
            time_to_send,
        })
    }

    /// Scheduled date and time shifted from the chosen zone to UTC
    fn schedule_utc(&self) -> Result<(String, String), FormError> {
        let (date, time) = (self.date.trim(), self.time.trim());
        if date.is_empty() || time.is_empty() {
            return Err(FormError::MissingSchedule);
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate(date.to_string()))?;
        let time = NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .map_err(|_| FormError::InvalidTime(time.to_string()))?;
        let zone = Timezone::lookup(&self.timezone)
            .ok_or_else(|| FormError::UnsupportedTimezone(self.timezone.clone()))?;

        let utc = to_utc(date, time, zone.offset_hours);
        Ok((
            utc.format("%Y-%m-%d").to_string(),
            utc.format("%H:%M").to_string(),
        ))
    }
}

/// Validate and send the form.
///
/// Validation failures come back as `Err` and nothing is sent. Transport
/// failures are rendered into the returned text.
pub fn submit(
    form: &TestEmailForm,
    transport: &dyn Transport,
    path: &str,
) -> Result<String, FormError> {
    let request = form.build_request()?;
    info!(
        recipient = %request.recipient,
        is_timed = request.is_timed,
        "sending test email"
    );

    let payload = match serde_json::to_value(&request) {
        Ok(v) => v,
        Err(e) => return Ok(format!("Error: {}", e)),
    };

    match transport.post_json(path, &payload) {
        Ok(reply) => Ok(render_reply(&reply)),
        Err(e) => {
            warn!("test email request failed: {:#}", e);
            Ok(format!("Error: {:#}", e))
        }
    }
}
