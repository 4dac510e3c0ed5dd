//! Integration tests for the HTTP query client: success, non-JSON response,
//! backend error body, unreachable backend. Uses a minimal in-process HTTP
//! server (no mocks).

use album_chat_client::{ClientError, QueryClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(headers: &str) -> usize {
    headers
        .lines()
        .find_map(|l| {
            let (name, value) = l.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}

/// Read one full HTTP request (headers plus content-length body).
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            let headers = String::from_utf8_lossy(&buf[..pos]).to_string();
            if buf.len() >= pos + 4 + content_length(&headers) {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Spawn a server that answers exactly one request with the given status
/// line, content type and body. Returns the port and a receiver for the raw
/// request the server saw.
async fn spawn_one_shot(
    status_line: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> (u16, tokio::sync::oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            content_type,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
        let _ = tx.send(request);
    });
    (port, rx)
}

fn request_body(request: &str) -> &str {
    request.split("\r\n\r\n").nth(1).unwrap_or("")
}

#[tokio::test]
async fn submit_query_parses_answer_and_routing() {
    let (port, request_rx) = spawn_one_shot(
        "200 OK",
        "application/json",
        r#"{"query":"How many songs are in The Link?","answer":"The Link has 10 songs.","routing":{"query_type":"single","sections":["overview"],"albums":["The Link"],"confidence":0.9,"method":"rule_based"}}"#,
    )
    .await;

    let client = QueryClient::new(&format!("http://127.0.0.1:{}", port));
    let response = client
        .submit_query("How many songs are in The Link?", 10)
        .await
        .expect("query should succeed");

    assert_eq!(response.query, "How many songs are in The Link?");
    assert_eq!(response.answer, "The Link has 10 songs.");
    let routing = response.routing.expect("routing should be present");
    assert_eq!(routing.query_type, "single");
    assert_eq!(routing.sections, vec!["overview"]);
    assert_eq!(routing.albums, vec!["The Link"]);
    assert_eq!(routing.confidence_percent(), 90);
    assert_eq!(routing.method.as_deref(), Some("rule_based"));

    // The request body is exactly `{query, k}`.
    let request = request_rx.await.expect("server should see the request");
    let sent: serde_json::Value = serde_json::from_str(request_body(&request)).unwrap();
    assert_eq!(
        sent,
        serde_json::json!({"query": "How many songs are in The Link?", "k": 10})
    );
}

#[tokio::test]
async fn routing_accepts_legacy_type_field_name() {
    let (port, _rx) = spawn_one_shot(
        "200 OK",
        "application/json",
        r#"{"query":"q","answer":"a","routing":{"type":"comparison","sections":["technical_analysis"],"confidence":0.72}}"#,
    )
    .await;

    let client = QueryClient::new(&format!("http://127.0.0.1:{}", port));
    let response = client.submit_query("q", 10).await.expect("query should succeed");
    let routing = response.routing.expect("routing should be present");
    assert_eq!(routing.query_type, "comparison");
    assert!(routing.albums.is_empty());
    assert_eq!(routing.method, None);
}

#[tokio::test]
async fn null_routing_is_accepted() {
    let (port, _rx) = spawn_one_shot(
        "200 OK",
        "application/json",
        r#"{"query":"q","answer":"a","routing":null}"#,
    )
    .await;

    let client = QueryClient::new(&format!("http://127.0.0.1:{}", port));
    let response = client.submit_query("q", 10).await.expect("query should succeed");
    assert_eq!(response.routing, None);
}

#[tokio::test]
async fn html_response_is_malformed_response_error() {
    let (port, _rx) = spawn_one_shot(
        "200 OK",
        "text/html",
        "<html><body><h1>It works!</h1></body></html>",
    )
    .await;

    let client = QueryClient::new(&format!("http://127.0.0.1:{}", port));
    let err = client
        .submit_query("q", 10)
        .await
        .expect_err("non-JSON response should fail");

    assert!(matches!(err, ClientError::MalformedResponse { .. }));
    let message = err.to_string();
    assert!(message.contains("non-JSON"), "message: {}", message);
    assert!(
        message.contains("<html><body><h1>It works!</h1>"),
        "message should carry a body preview: {}",
        message
    );
}

#[tokio::test]
async fn backend_error_message_comes_from_detail_field() {
    let (port, _rx) = spawn_one_shot(
        "500 Internal Server Error",
        "application/json",
        r#"{"detail":"index not loaded"}"#,
    )
    .await;

    let client = QueryClient::new(&format!("http://127.0.0.1:{}", port));
    let err = client
        .submit_query("q", 10)
        .await
        .expect_err("500 should fail");

    assert!(matches!(err, ClientError::Backend { status: 500, .. }));
    assert_eq!(err.to_string(), "index not loaded");
}

#[tokio::test]
async fn backend_error_without_detail_is_generic() {
    let (port, _rx) =
        spawn_one_shot("502 Bad Gateway", "application/json", r#"{}"#).await;

    let client = QueryClient::new(&format!("http://127.0.0.1:{}", port));
    let err = client
        .submit_query("q", 10)
        .await
        .expect_err("502 should fail");

    assert_eq!(err.to_string(), "HTTP error 502");
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    // Bind then drop a listener so the port is free but nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = QueryClient::new(&format!("http://127.0.0.1:{}", port));
    let err = client
        .submit_query("q", 10)
        .await
        .expect_err("connection should be refused");

    assert!(matches!(err, ClientError::Transport(_)));
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn check_health_returns_parsed_body() {
    let (port, _rx) =
        spawn_one_shot("200 OK", "application/json", r#"{"status":"healthy"}"#).await;

    let client = QueryClient::new(&format!("http://127.0.0.1:{}", port));
    let body = client.check_health().await.expect("health should succeed");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn check_health_non_success_status_fails() {
    let (port, _rx) = spawn_one_shot(
        "500 Internal Server Error",
        "application/json",
        r#"{"status":"down"}"#,
    )
    .await;

    let client = QueryClient::new(&format!("http://127.0.0.1:{}", port));
    let err = client
        .check_health()
        .await
        .expect_err("500 health should fail");
    assert_eq!(err.to_string(), "Health check failed");
}
