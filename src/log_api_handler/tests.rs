//! Integration tests for the Log API handler.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rstest::{fixture, rstest};

use crate::handler::{Handler, HandlerError};
use crate::level::Level;
use crate::log_record::LogRecord;

use super::config::{LogApiConfig, UNSET_LICENSE_KEY};
use super::handler::LogApiHandler;
use super::transport::Delivery;

const TEST_LICENSE_KEY: &str = "0123456789abcdef";

#[derive(Debug)]
struct CapturedRequest {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn status_text(code: u16) -> &'static str {
    match code {
        200 => "OK",
        202 => "Accepted",
        403 => "Forbidden",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Parses a single header line into a key-value pair.
fn parse_header_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    line.split_once(':')
        .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
}

fn read_headers(reader: &mut BufReader<TcpStream>) -> (Vec<(String, String)>, usize) {
    let mut headers = Vec::new();
    let mut content_length = 0usize;

    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read header");
        if line.trim().is_empty() {
            break;
        }
        let Some((key, value)) = parse_header_line(&line) else {
            continue;
        };
        if key == "content-length" {
            content_length = value.parse().unwrap_or(0);
        }
        headers.push((key, value));
    }

    (headers, content_length)
}

fn read_http_request(stream: &mut TcpStream) -> CapturedRequest {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .expect("read request line");
    let parts: Vec<&str> = request_line.trim().split(' ').collect();
    let method = parts.first().unwrap_or(&"").to_string();
    let path = parts.get(1).unwrap_or(&"").to_string();

    let (headers, content_length) = read_headers(&mut reader);
    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).expect("read body");
    }

    CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    }
}

/// Spawn a mock HTTP server answering successive requests with the given
/// statuses, capturing each request.
fn spawn_mock_server(
    listener: TcpListener,
    statuses: Vec<u16>,
) -> (SocketAddr, mpsc::Receiver<CapturedRequest>) {
    let addr = listener.local_addr().expect("listener has address");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for status in statuses {
            let Ok((mut stream, _)) = listener.accept() else {
                break;
            };
            let captured = read_http_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Length: 0\r\n\r\n",
                status,
                status_text(status)
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = tx.send(captured);
        }
    });

    (addr, rx)
}

/// Spawn a server that accepts one connection, reads the request, and
/// never responds.
fn spawn_stalling_server(listener: TcpListener) -> SocketAddr {
    let addr = listener.local_addr().expect("listener has address");
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let _ = read_http_request(&mut stream);
            thread::sleep(Duration::from_secs(10));
        }
    });
    addr
}

#[fixture]
fn tcp_listener() -> TcpListener {
    TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener")
}

fn test_config(addr: SocketAddr) -> LogApiConfig {
    LogApiConfig {
        license_key: TEST_LICENSE_KEY.to_owned(),
        host: Some(addr.to_string()),
        protocol: "http://".to_owned(),
        ..LogApiConfig::default()
    }
}

fn build_handler(addr: SocketAddr) -> LogApiHandler {
    LogApiHandler::with_config(test_config(addr)).expect("construct handler")
}

fn recv_request(rx: &mpsc::Receiver<CapturedRequest>) -> CapturedRequest {
    rx.recv_timeout(Duration::from_secs(5)).expect("request")
}

#[rstest]
fn send_posts_payload_with_required_headers(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![202]);
    let handler = build_handler(addr);

    let payload = r#"{"message":"hello","level":"INFO"}"#;
    let delivery = handler.send_payload(payload);
    assert_eq!(delivery, Delivery::Accepted { status: 202 });

    let captured = recv_request(&rx);
    assert_eq!(captured.method, "POST");
    assert_eq!(captured.path, "/log/v1");
    assert_eq!(captured.header("content-type"), Some("application/json"));
    assert_eq!(captured.header("x-license-key"), Some(TEST_LICENSE_KEY));
    assert_eq!(captured.body, payload);
}

#[rstest]
fn send_batch_wraps_payload_in_envelope(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![202]);
    let handler = build_handler(addr);

    let delivery = handler.send_batch_payload(r#"[{"message":"a"},{"message":"b"}]"#);
    assert!(delivery.is_accepted());

    let captured = recv_request(&rx);
    assert_eq!(
        captured.body,
        r#"[{"logs":[{"message":"a"},{"message":"b"}]}]"#
    );
}

#[rstest]
fn empty_license_key_ships_the_sentinel(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![202]);
    let config = LogApiConfig {
        license_key: String::new(),
        ..test_config(addr)
    };
    let handler = LogApiHandler::with_config(config).expect("construct handler");

    handler.send_payload("{}");

    let captured = recv_request(&rx);
    assert_eq!(captured.header("x-license-key"), Some(UNSET_LICENSE_KEY));
}

#[rstest]
fn license_key_setter_applies_to_subsequent_sends(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![202, 202]);
    let handler = build_handler(addr);

    handler.send_payload("{}");
    assert_eq!(
        recv_request(&rx).header("x-license-key"),
        Some(TEST_LICENSE_KEY)
    );

    handler.set_license_key("fedcba9876543210");
    handler.send_payload("{}");
    assert_eq!(
        recv_request(&rx).header("x-license-key"),
        Some("fedcba9876543210")
    );
}

#[rstest]
fn rejected_status_is_reported_not_raised(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![500]);
    let handler = build_handler(addr);

    let delivery = handler.send_payload("{}");
    assert_eq!(delivery, Delivery::Rejected { status: 500 });
    assert!(!delivery.is_accepted());

    // The request still went out exactly once.
    recv_request(&rx);
}

#[rstest]
fn network_failure_returns_normally(tcp_listener: TcpListener) {
    // Bind to learn an ephemeral port, then free it so the connect fails.
    let addr = tcp_listener.local_addr().expect("listener has address");
    drop(tcp_listener);

    let handler = build_handler(addr);
    let delivery = handler.send_payload("{}");
    assert!(matches!(delivery, Delivery::Failed { .. }));
}

#[rstest]
fn stalled_server_trips_the_send_timeout(tcp_listener: TcpListener) {
    let addr = spawn_stalling_server(tcp_listener);
    let config = LogApiConfig {
        send_timeout: Duration::from_millis(200),
        ..test_config(addr)
    };
    let handler = LogApiHandler::with_config(config).expect("construct handler");

    let delivery = handler.send_payload("{}");
    assert!(matches!(delivery, Delivery::Failed { .. }));
}

#[rstest]
fn handle_serialises_and_ships_the_record(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![202]);
    let handler = build_handler(addr);

    let record = LogRecord::new("app.core", Level::Error, "disk full");
    handler.handle(record.clone()).expect("handle");

    let captured = recv_request(&rx);
    let parsed: serde_json::Value = serde_json::from_str(&captured.body).expect("json body");
    assert_eq!(parsed["message"], "disk full");
    assert_eq!(parsed["level"], "ERROR");
    assert_eq!(parsed["logger"], "app.core");
    assert_eq!(parsed["timestamp"], record.timestamp_millis());
}

#[rstest]
fn handle_batch_ships_all_records_in_one_request(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![202]);
    let handler = build_handler(addr);

    let records = vec![
        LogRecord::new("app.core", Level::Info, "started"),
        LogRecord::new("app.core", Level::Info, "listening"),
    ];
    handler.handle_batch(&records).expect("handle batch");

    let captured = recv_request(&rx);
    let parsed: serde_json::Value = serde_json::from_str(&captured.body).expect("json body");
    let groups = parsed.as_array().expect("envelope array");
    assert_eq!(groups.len(), 1);
    let logs = groups[0]["logs"].as_array().expect("logs array");
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["message"], "started");
    assert_eq!(logs[1]["message"], "listening");
}

#[rstest]
fn handle_after_close_reports_closed(tcp_listener: TcpListener) {
    let addr = tcp_listener.local_addr().expect("listener has address");
    let handler = build_handler(addr);

    handler.close();
    let result = handler.handle(LogRecord::new("app.core", Level::Info, "late"));
    assert_eq!(result, Err(HandlerError::Closed));
    assert!(!handler.flush());
}
