//! A canned-response HTTP server for exercising the client without network
//! access.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const NOT_FOUND_BODY: &str = r#"{"message":"Not Found","documentation_url":"https://docs.github.com/rest"}"#;

#[derive(Debug, Clone)]
pub struct Route {
    path: &'static str,
    status: u16,
    body: &'static str,
}

impl Route {
    pub fn new(path: &'static str, status: u16, body: &'static str) -> Self {
        Self { path, status, body }
    }

    pub fn ok(path: &'static str, body: &'static str) -> Self {
        Self::new(path, 200, body)
    }
}

pub struct MockGitHub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockGitHub {
    /// Raw request heads received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serves `routes` on an ephemeral local port. Unknown paths get a 404.
pub async fn mock_github(routes: Vec<Route>) -> MockGitHub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let captured = Arc::clone(&requests);
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            handle(stream, &routes, &captured).await;
        }
    });

    MockGitHub {
        base_url: format!("http://{addr}"),
        requests,
    }
}

async fn handle(mut stream: TcpStream, routes: &[Route], captured: &Mutex<Vec<String>>) {
    let mut data = Vec::new();
    let mut chunk = [0u8; 1024];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => data.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&data).to_string();
    let path = head.split_whitespace().nth(1).unwrap_or("").to_string();
    captured.lock().unwrap().push(head);

    let (status, body) = routes
        .iter()
        .find(|r| r.path == path)
        .map_or((404, NOT_FOUND_BODY), |r| (r.status, r.body));
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };

    let response = format!(
        "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json; charset=utf-8\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
