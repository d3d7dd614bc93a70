//! Per-request view of the inbound message.
//!
//! # Responsibilities
//! - Expose method, path, headers (case-insensitive) and request ID
//! - Hold path and query parameters filled in by the dispatcher
//! - Drain and parse the JSON body on demand
//!
//! # Design Decisions
//! - Body stays in the transport until `parse_body` is called
//! - Parsing is idempotent: once a value exists it is never replaced
//! - Malformed, oversized or unreadable bodies become `{}`, never an error

use std::collections::HashMap;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, Uri};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::http::X_REQUEST_ID;

/// Structured request passed through middleware and handlers.
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,

    /// Path parameters bound by the matched route pattern.
    pub params: HashMap<String, String>,

    /// Query-string parameters (last value wins on duplicate keys).
    pub query: HashMap<String, String>,

    body: Option<Value>,
    raw_body: Option<Body>,
    body_limit: usize,
}

impl RequestContext {
    /// Wrap a transport request. `body_limit` caps how many bytes `parse_body` will read.
    pub fn new(request: Request<Body>, body_limit: usize) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            params: HashMap::new(),
            query: HashMap::new(),
            body: None,
            raw_body: Some(body),
            body_limit,
        }
    }

    /// The request method, e.g. `"GET"`.
    ///
    /// The transport always supplies one; requests built without an explicit
    /// method default to `GET`.
    pub fn method(&self) -> &str {
        self.method.as_str()
    }

    /// The raw request path, without the query string.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Case-insensitive header lookup. Values that are not visible ASCII are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The `x-request-id` assigned at the edge of the service, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.header(X_REQUEST_ID)
    }

    /// A single path parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// A single query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// The parsed body, or `None` if `parse_body` has not run yet.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Deserialize the parsed body into `T`.
    ///
    /// Returns `None` if the body has not been parsed or does not fit `T`.
    pub fn body_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.body
            .as_ref()
            .and_then(|v| T::deserialize(v).ok())
    }

    /// Drain the request payload and parse it as JSON.
    ///
    /// A second call is a no-op and returns the value produced by the first.
    pub async fn parse_body(&mut self) -> &Value {
        if self.body.is_none() {
            let value = self.read_json().await;
            self.body = Some(value);
        }
        self.body.get_or_insert_with(empty_object)
    }

    async fn read_json(&mut self) -> Value {
        let Some(raw) = self.raw_body.take() else {
            return empty_object();
        };

        let bytes = match axum::body::to_bytes(raw, self.body_limit).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    path = %self.uri.path(),
                    limit = self.body_limit,
                    error = %e,
                    "Failed to read request body"
                );
                return empty_object();
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "Request body is not JSON");
                empty_object()
            }
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
