//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use buidl_client::transport::{ApiRequest, ApiResponse, HttpTransport, TransportError};

type Responder = dyn Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync;
type Latency = dyn Fn(&ApiRequest) -> Duration + Send + Sync;

/// In-memory transport that records every request and replies from a closure.
pub struct MockTransport {
    responder: Box<Responder>,
    latency: Box<Latency>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            latency: Box::new(|_| Duration::ZERO),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `status` and `body`, following the transport
    /// contract that non-2xx becomes `TransportError::Status`.
    pub fn replying(status: u16, body: &'static str) -> Self {
        Self::new(move |_| status_response(status, body))
    }

    pub fn with_latency_by<F>(mut self, latency: F) -> Self
    where
        F: Fn(&ApiRequest) -> Duration + Send + Sync + 'static,
    {
        self.latency = Box::new(latency);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> ApiRequest {
        self.calls.lock().unwrap().last().cloned().expect("no calls recorded")
    }
}

pub fn status_response(status: u16, body: &str) -> Result<ApiResponse, TransportError> {
    if (200..300).contains(&status) {
        Ok(ApiResponse::new(status, body))
    } else {
        Err(TransportError::Status {
            status,
            body: body.to_string(),
        })
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());

        let delay = (self.latency)(&request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        (self.responder)(&request)
    }
}

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Start an HTTP backend on an ephemeral port that records requests and
/// answers with whatever `respond` returns.
pub async fn start_recording_backend<F>(
    respond: F,
) -> (SocketAddr, Arc<Mutex<Vec<RecordedRequest>>>)
where
    F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let handler_log = log.clone();
    let app = Router::new().fallback(move |req: Request| {
        let log = handler_log.clone();
        let respond = respond.clone();
        async move {
            let (parts, body) = req.into_parts();
            let body = to_bytes(body, usize::MAX).await.unwrap();
            let recorded = RecordedRequest {
                method: parts.method.to_string(),
                path: parts.uri.path().to_string(),
                query: parts.uri.query().map(str::to_string),
                headers: parts
                    .headers
                    .iter()
                    .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
                    .collect(),
                body: String::from_utf8_lossy(&body).into_owned(),
            };

            let (status, reply) = respond(&recorded);
            log.lock().unwrap().push(recorded);
            (StatusCode::from_u16(status).unwrap(), reply)
        }
    });

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, log)
}

/// Start a raw backend that sends `status_line` with a `Content-Length`
/// larger than the body, then closes the connection mid-body.
pub async fn start_truncated_backend(status_line: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        read_full_request(&mut socket).await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: 100\r\nConnection: close\r\n\r\npartial",
                            status_line
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_full_request(socket: &mut tokio::net::TcpStream) {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
        let text = String::from_utf8_lossy(&data);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= end + 4 + content_length {
                return;
            }
        }
    }
}
