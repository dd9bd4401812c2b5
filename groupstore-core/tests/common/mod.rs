//! In-process store server for integration tests.
//!
//! Implements the versioned-resource contract the client relies on:
//! `ETag` on reads, `If-Match` / `If-None-Match: *` preconditions on writes,
//! newline-separated collection listings, and a text/plain password endpoint.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// API root path served by the test server.
pub const API_ROOT: &str = "/api";

/// A request as seen by the server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub if_match: Option<String>,
    pub if_none_match: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
struct Entry {
    body: Value,
    etag: String,
}

/// Mutable server state, shared with the test through [`TestServer::state`].
#[derive(Debug, Default)]
pub struct ServerState {
    resources: BTreeMap<String, Entry>,
    last_version: u64,
    /// Leave `ETag` off item reads.
    pub omit_etag: bool,
    /// Terminate collection listings with a line feed.
    pub list_trailing_newline: bool,
    /// Simulate another writer changing an item right after each read.
    pub bump_after_read: bool,
    /// Reject requests whose `Authorization` differs from this value.
    pub required_auth: Option<String>,
    /// Every request received, in arrival order.
    pub requests: Vec<RecordedRequest>,
    /// Passwords set through the password endpoint, by user path.
    pub passwords: BTreeMap<String, String>,
}

impl ServerState {
    fn next_etag(&mut self) -> String {
        self.last_version += 1;
        format!("\"{}\"", self.last_version)
    }

    /// Stores a document directly, returning its version.
    pub fn seed(&mut self, path: &str, body: Value) -> String {
        let etag = self.next_etag();
        self.resources.insert(
            path.to_string(),
            Entry {
                body,
                etag: etag.clone(),
            },
        );
        etag
    }

    /// Returns the stored document at `path`.
    pub fn document(&self, path: &str) -> Option<Value> {
        self.resources.get(path).map(|e| e.body.clone())
    }

    /// Returns the current version at `path`.
    pub fn etag(&self, path: &str) -> Option<String> {
        self.resources.get(path).map(|e| e.etag.clone())
    }

    /// Returns recorded requests with the given method.
    pub fn requests_with(&self, method: Method) -> Vec<RecordedRequest> {
        self.requests
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }
}

type SharedState = Arc<Mutex<ServerState>>;

/// A store server bound to an ephemeral local port.
pub struct TestServer {
    addr: SocketAddr,
    state: SharedState,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let state: SharedState = Arc::new(Mutex::new(ServerState {
            list_trailing_newline: true,
            ..Default::default()
        }));

        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL of the API root, e.g. `http://127.0.0.1:1234/api`.
    pub fn api_url(&self) -> String {
        format!("http://{}{}", self.addr, API_ROOT)
    }

    /// Full URL for a server path.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn state(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn handle(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut state = state.lock().unwrap();
    let path = uri.path().to_string();

    let recorded = RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        if_match: header_string(&headers, header::IF_MATCH),
        if_none_match: header_string(&headers, header::IF_NONE_MATCH),
        authorization: header_string(&headers, header::AUTHORIZATION),
        content_type: header_string(&headers, header::CONTENT_TYPE),
        body: body.to_vec(),
    };
    state.requests.push(recorded.clone());

    if let Some(required) = &state.required_auth {
        if recorded.authorization.as_deref() != Some(required.as_str()) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    if path.ends_with('/') {
        return match method {
            Method::GET => list(&state, &path),
            _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
        };
    }

    if let Some(user_path) = path.strip_suffix("/password") {
        return match method {
            Method::POST => set_password(&mut state, user_path, &recorded),
            _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
        };
    }

    match method {
        Method::GET => get(&mut state, &path, &recorded),
        Method::PUT => put(&mut state, &path, &recorded),
        Method::DELETE => delete(&mut state, &path, &recorded),
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

fn list(state: &ServerState, path: &str) -> Response {
    // `/api/groups/g/users/` needs `/api/groups/g` to exist.
    let parent = path
        .trim_end_matches('/')
        .rsplit_once('/')
        .map(|(parent, _)| parent)
        .unwrap_or("");
    if parent != API_ROOT && !state.resources.contains_key(parent) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let names: Vec<&str> = state
        .resources
        .keys()
        .filter_map(|key| key.strip_prefix(path))
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
        .collect();

    let mut body = names.join("\n");
    if state.list_trailing_newline && !names.is_empty() {
        body.push('\n');
    }

    ([(header::CONTENT_TYPE, "text/plain")], body).into_response()
}

fn get(state: &mut ServerState, path: &str, request: &RecordedRequest) -> Response {
    let Some(entry) = state.resources.get(path).cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if let Some(if_match) = &request.if_match {
        if if_match != "*" && *if_match != entry.etag {
            return StatusCode::PRECONDITION_FAILED.into_response();
        }
    }

    if state.bump_after_read {
        let etag = state.next_etag();
        if let Some(stored) = state.resources.get_mut(path) {
            stored.etag = etag;
        }
    }

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
    if !state.omit_etag {
        headers.insert(header::ETAG, entry.etag.parse().unwrap());
    }

    (headers, entry.body.to_string()).into_response()
}

fn put(state: &mut ServerState, path: &str, request: &RecordedRequest) -> Response {
    let body: Value = match serde_json::from_slice(&request.body) {
        Ok(v) => v,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    let current = state.resources.get(path).map(|e| e.etag.clone());

    let status = match (&request.if_none_match, &request.if_match, &current) {
        (Some(inm), _, Some(_)) if inm == "*" => {
            return StatusCode::PRECONDITION_FAILED.into_response()
        }
        (Some(inm), _, None) if inm == "*" => StatusCode::CREATED,
        (_, Some(_), None) => return StatusCode::PRECONDITION_FAILED.into_response(),
        (_, Some(im), Some(etag)) if im != "*" && im != etag => {
            return StatusCode::PRECONDITION_FAILED.into_response()
        }
        (_, Some(_), Some(_)) => StatusCode::OK,
        _ => return StatusCode::PRECONDITION_REQUIRED.into_response(),
    };

    let etag = state.seed(path, body);
    (status, [(header::ETAG, etag)]).into_response()
}

fn delete(state: &mut ServerState, path: &str, request: &RecordedRequest) -> Response {
    let Some(current) = state.etag(path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if let Some(if_match) = &request.if_match {
        if if_match != "*" && *if_match != current {
            return StatusCode::PRECONDITION_FAILED.into_response();
        }
    }

    let children = format!("{}/", path);
    state
        .resources
        .retain(|key, _| key != path && !key.starts_with(&children));

    StatusCode::NO_CONTENT.into_response()
}

fn set_password(state: &mut ServerState, user_path: &str, request: &RecordedRequest) -> Response {
    if !state.resources.contains_key(user_path) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let password = String::from_utf8_lossy(&request.body).into_owned();
    state.passwords.insert(user_path.to_string(), password);

    StatusCode::NO_CONTENT.into_response()
}

/// A server that answers every connection with the same raw bytes.
///
/// Lets tests send status lines and headers that axum would normalise, such
/// as a custom reason phrase or an `ETag` that is not ASCII.
pub struct RawServer {
    addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl RawServer {
    pub async fn start(response: Vec<u8>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = Arc::new(response);

        let handle = tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let response = response.clone();
                tokio::spawn(async move {
                    // Requests from these tests have no body; the head is enough.
                    let mut head = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => head.extend_from_slice(&buf[..n]),
                        }
                    }
                    let _ = stream.write_all(&response).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self { addr, handle }
    }

    /// Starts a server answering with `status_line` and an empty body.
    pub async fn status(status_line: &str) -> Self {
        Self::start(raw_response(status_line, &[], b"")).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RawServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Assembles an HTTP/1.1 response; header values are written as raw bytes.
pub fn raw_response(status_line: &str, headers: &[(&str, &[u8])], body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(status_line.as_bytes());
    out.extend_from_slice(b"\r\n");
    for (name, value) in headers {
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
    out.extend_from_slice(b"Connection: close\r\n\r\n");
    out.extend_from_slice(body);
    out
}

/// Returns a local URL nothing is listening on.
pub async fn closed_port_url(path: &str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, path)
}
