use std::cell::RefCell;

use anyhow::{Result, anyhow};
use serde_json::Value;

use mailadmin::compose::{FormError, TestEmailForm, submit};
use mailadmin::service::{Offline, Reply, Transport};

/// Records every request and answers with a canned reply
#[derive(Default)]
struct FakeTransport {
    calls: RefCell<Vec<(String, Value)>>,
    fail: bool,
}

impl Transport for FakeTransport {
    fn post_json(&self, path: &str, body: &Value) -> Result<Reply> {
        self.calls
            .borrow_mut()
            .push((path.to_string(), body.clone()));
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(Reply {
            status: 200,
            body: r#"{"message":"queued"}"#.to_string(),
        })
    }
}

fn form() -> TestEmailForm {
    TestEmailForm {
        recipient: "ops@example.com".to_string(),
        subject: "Smoke test".to_string(),
        body: "hello".to_string(),
        timezone: "UTC".to_string(),
        ..TestEmailForm::default()
    }
}

#[test]
fn empty_body_never_sends() {
    let transport = FakeTransport::default();
    let blank = TestEmailForm {
        body: "  \n ".to_string(),
        is_timed: true,
        timezone: "Mars/Olympus".to_string(),
        ..form()
    };

    let err = submit(&blank, &transport, "/send-test-email").unwrap_err();
    assert_eq!(err, FormError::EmptyBody);
    assert!(transport.calls.borrow().is_empty());
}

#[test]
fn unsupported_timezone_never_sends() {
    let transport = FakeTransport::default();
    let bad = TestEmailForm {
        is_timed: true,
        date: "2025-06-10".to_string(),
        time: "02:00".to_string(),
        timezone: "Mars/Olympus".to_string(),
        ..form()
    };

    let err = submit(&bad, &transport, "/send-test-email").unwrap_err();
    assert_eq!(err, FormError::UnsupportedTimezone("Mars/Olympus".to_string()));
    assert!(transport.calls.borrow().is_empty());
}

#[test]
fn timed_tokyo_posts_utc_time() {
    let transport = FakeTransport::default();
    let timed = TestEmailForm {
        is_timed: true,
        date: "2025-06-10".to_string(),
        time: "02:00".to_string(),
        timezone: "Asia/Tokyo".to_string(),
        ..form()
    };

    let text = submit(&timed, &transport, "/send-test-email").unwrap();
    assert!(text.starts_with("HTTP 200"));
    assert!(text.contains("queued"));

    let calls = transport.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (path, body) = &calls[0];
    assert_eq!(path, "/send-test-email");
    assert_eq!(body["time_to_send"], "17:00");
    assert_eq!(body["date_to_send"], "2025-06-09");
    assert_eq!(body["is_timed"], true);
    assert_eq!(body["recipient"], "ops@example.com");
}

#[test]
fn untimed_omits_schedule() {
    let transport = FakeTransport::default();
    submit(&form(), &transport, "/custom").unwrap();

    let calls = transport.calls.borrow();
    let (path, body) = &calls[0];
    assert_eq!(path, "/custom");
    assert_eq!(body["is_timed"], false);
    assert!(body.get("date_to_send").is_none());
    assert!(body.get("time_to_send").is_none());
}

#[test]
fn transport_failure_is_shown_as_text() {
    let transport = FakeTransport {
        fail: true,
        ..FakeTransport::default()
    };

    let text = submit(&form(), &transport, "/send-test-email").unwrap();
    assert!(text.starts_with("Error:"));
    assert!(text.contains("connection refused"));
    assert_eq!(transport.calls.borrow().len(), 1);
}

#[test]
fn offline_transport_reports_form_errors_first() {
    let offline = Offline("service client unavailable".to_string());

    let blank = TestEmailForm {
        body: String::new(),
        ..form()
    };
    assert_eq!(
        submit(&blank, &offline, "/send-test-email"),
        Err(FormError::EmptyBody)
    );

    let text = submit(&form(), &offline, "/send-test-email").unwrap();
    assert_eq!(text, "Error: service client unavailable");
}
