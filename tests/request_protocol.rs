use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use authlink::{
    ProxyConfig, RequestEvent, RequestExecutor, RequestObserver, Url, constant_url,
};

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Reads one full HTTP/1.1 request off the socket, honoring Content-Length.
fn read_request(socket: &mut TcpStream) -> (String, String) {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];
    let header_end = loop {
        if let Some(pos) = find_subsequence(&buffer, b"\r\n\r\n") {
            break pos;
        }
        let read = socket.read(&mut chunk).expect("read request head");
        assert!(read > 0, "connection closed before request head was complete");
        buffer.extend_from_slice(&chunk[..read]);
    };
    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);
    let mut body = buffer[header_end + 4..].to_vec();
    while body.len() < content_length {
        let read = socket.read(&mut chunk).expect("read request body");
        assert!(read > 0, "connection closed before request body was complete");
        body.extend_from_slice(&chunk[..read]);
    }
    (head, String::from_utf8_lossy(&body).to_string())
}

fn write_response(socket: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).expect("write response");
    socket.flush().expect("flush response");
}

/// Serves `connections` requests with a fixed status and body.
fn spawn_canned_server(status: u16, status_text: &'static str, body: &'static str, connections: usize) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let address = listener.local_addr().expect("listener addr");
    thread::spawn(move || {
        for _ in 0..connections {
            let (mut socket, _) = listener.accept().expect("accept");
            read_request(&mut socket);
            write_response(&mut socket, status, status_text, body);
        }
    });
    constant_url(&format!("http://{address}"))
}

/// Serves one request, answering 200 with the received request body.
fn spawn_body_echo_server() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let address = listener.local_addr().expect("listener addr");
    thread::spawn(move || {
        let (mut socket, _) = listener.accept().expect("accept");
        let (_, body) = read_request(&mut socket);
        write_response(&mut socket, 200, "OK", &body);
    });
    constant_url(&format!("http://{address}"))
}

/// Serves one request, answering with selected request header values, one
/// per line, `-` when the header was absent.
fn spawn_header_echo_server(headers: &'static [&'static str]) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let address = listener.local_addr().expect("listener addr");
    thread::spawn(move || {
        let (mut socket, _) = listener.accept().expect("accept");
        let (head, _) = read_request(&mut socket);
        let echoed = headers
            .iter()
            .map(|name| {
                head.lines()
                    .find_map(|line| {
                        let (header, value) = line.split_once(':')?;
                        header.eq_ignore_ascii_case(name).then(|| value.trim().to_string())
                    })
                    .unwrap_or_else(|| "-".to_string())
            })
            .collect::<Vec<_>>()
            .join("\n");
        write_response(&mut socket, 200, "OK", &echoed);
    });
    constant_url(&format!("http://{address}"))
}

/// Accepts one connection and drops it before sending a single byte.
fn spawn_reset_server() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let address = listener.local_addr().expect("listener addr");
    thread::spawn(move || {
        let (socket, _) = listener.accept().expect("accept");
        drop(socket);
    });
    constant_url(&format!("http://{address}"))
}

struct RecordingObserver(Mutex<Vec<&'static str>>);

impl RecordingObserver {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Vec::new())))
    }

    fn labels(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }
}

impl RequestObserver for RecordingObserver {
    fn on_event(&self, event: &RequestEvent<'_>) {
        let label = match event {
            RequestEvent::Opening { .. } => "opening",
            RequestEvent::SendingBody { .. } => "sending_body",
            RequestEvent::Reading { .. } => "reading",
            RequestEvent::Read { .. } => "read",
            RequestEvent::Failed { .. } => "failed",
        };
        self.0.lock().unwrap().push(label);
    }
}

#[tokio::test]
async fn post_echoes_the_request_body() {
    let url = spawn_body_echo_server();
    let executor = RequestExecutor::new(ProxyConfig::Direct);
    let outcome = executor
        .post(&url, "a=1", "application/x-www-form-urlencoded")
        .await
        .unwrap();
    assert_eq!(outcome.body(), "a=1");
    assert_eq!(outcome.status(), 200);
    assert!(outcome.is_success());
}

#[tokio::test]
async fn post_sets_content_type_charset_and_length() {
    let url = spawn_header_echo_server(&["content-type", "content-length"]);
    let executor = RequestExecutor::new(ProxyConfig::Direct);
    let outcome = executor
        .post(&url, "a=1", "application/x-www-form-urlencoded")
        .await
        .unwrap();
    assert_eq!(
        outcome.body(),
        "application/x-www-form-urlencoded; charset=utf-8\n3"
    );
}

#[tokio::test]
async fn get_returns_server_error_page_as_data() {
    let url = spawn_canned_server(500, "Internal Server Error", "error detail", 1);
    let executor = RequestExecutor::new(ProxyConfig::Direct);
    let outcome = executor.get(&url).await.unwrap();
    assert_eq!(outcome.body(), "error detail");
    assert_eq!(outcome.status(), 500);
    assert!(!outcome.is_success());
}

#[tokio::test]
async fn get_with_authorization_attaches_the_header() {
    let url = spawn_header_echo_server(&["authorization"]);
    let executor = RequestExecutor::new(ProxyConfig::Direct);
    let outcome = executor
        .get_with_authorization(&url, Some("Bearer token-123"))
        .await
        .unwrap();
    assert_eq!(outcome.body(), "Bearer token-123");
}

#[tokio::test]
async fn plain_get_sends_no_authorization_header() {
    let url = spawn_header_echo_server(&["authorization"]);
    let executor = RequestExecutor::new(ProxyConfig::Direct);
    let outcome = executor.get(&url).await.unwrap();
    assert_eq!(outcome.body(), "-");
}

#[tokio::test]
async fn get_propagates_a_connection_reset() {
    let url = spawn_reset_server();
    let executor = RequestExecutor::new(ProxyConfig::Direct);
    assert!(executor.get(&url).await.is_err());
}

#[tokio::test]
async fn observer_sees_the_get_protocol_in_order() {
    let url = spawn_canned_server(200, "OK", "{}", 1);
    let observer = RecordingObserver::new();
    let executor = RequestExecutor::with_observer(ProxyConfig::Direct, observer.clone());
    executor.get(&url).await.unwrap();
    assert_eq!(observer.labels(), vec!["opening", "reading", "read"]);
}

#[tokio::test]
async fn observer_sees_the_post_protocol_in_order() {
    let url = spawn_body_echo_server();
    let observer = RecordingObserver::new();
    let executor = RequestExecutor::with_observer(ProxyConfig::Direct, observer.clone());
    executor.post(&url, "a=1", "text/plain").await.unwrap();
    assert_eq!(
        observer.labels(),
        vec!["opening", "sending_body", "reading", "read"]
    );
}

#[tokio::test]
async fn observer_sees_a_hard_failure() {
    let url = spawn_reset_server();
    let observer = RecordingObserver::new();
    let executor = RequestExecutor::with_observer(ProxyConfig::Direct, observer.clone());
    assert!(executor.get(&url).await.is_err());
    assert_eq!(observer.labels(), vec!["opening", "reading", "failed"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn executor_is_shareable_across_concurrent_tasks() {
    let url = spawn_canned_server(200, "OK", "pong", 2);
    let executor = Arc::new(RequestExecutor::new(ProxyConfig::Direct));

    let first = tokio::spawn({
        let executor = Arc::clone(&executor);
        let url = url.clone();
        async move { executor.get(&url).await }
    });
    let second = tokio::spawn({
        let executor = Arc::clone(&executor);
        let url = url.clone();
        async move { executor.get(&url).await }
    });

    assert_eq!(first.await.unwrap().unwrap().body(), "pong");
    assert_eq!(second.await.unwrap().unwrap().body(), "pong");
}
