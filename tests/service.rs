use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use mailadmin::config::ServiceConfig;
use mailadmin::service::{ServiceClient, Transport};

/// Answer a single HTTP request with `body`. The handle yields the request head.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let head = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        head
    });
    (format!("http://{}", addr), handle)
}

/// Read headers plus a `Content-Length` body
fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&data);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

fn client(base_url: String) -> ServiceClient {
    ServiceClient::new(&ServiceConfig {
        base_url,
        timeout_secs: 5,
        ..ServiceConfig::default()
    })
    .unwrap()
}

#[test]
fn fetches_entries_from_logs_path() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"logs": [{"recipiant": "a@example.com", "status_code": 200}]}"#,
    );

    let entries = client(url).fetch_entries().unwrap();
    let head = server.join().unwrap();

    assert!(head.starts_with("GET /email-logs "));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].field("status_code"), Some("200"));
}

#[test]
fn post_returns_status_and_raw_body() {
    let (url, server) = serve_once("400 Bad Request", r#"{"error":"bad recipient"}"#);

    let reply = client(url)
        .post_json("/send-test-email", &serde_json::json!({"recipient": ""}))
        .unwrap();
    let head = server.join().unwrap();

    assert!(head.starts_with("POST /send-test-email "));
    assert_eq!(reply.status, 400);
    assert!(reply.body.contains("bad recipient"));
}

#[test]
fn unreachable_service_is_an_error() {
    // Bind then drop to get a port nobody listens on
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = client(format!("http://127.0.0.1:{}", port));
    assert!(client.ping().is_err());
    assert!(client.fetch_entries().is_err());
}
