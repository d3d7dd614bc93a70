//! Per-request response builder.
//!
//! # Responsibilities
//! - Collect status code and headers set by middleware and handlers
//! - Emit exactly one body (JSON or plain text)
//! - Convert into the transport response once dispatch finishes
//!
//! # Design Decisions
//! - The `sent` flag is the single source of truth for body emission
//! - Writes after the body was sent are silently ignored
//! - JSON is serialized before the response is committed, so a failed
//!   serialization leaves the response open for an error reply

use axum::body::{Body, Bytes};
use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::{HeaderMap, Response, StatusCode};
use serde::Serialize;

const APPLICATION_JSON: &str = "application/json";
const TEXT_PLAIN: &str = "text/plain";

/// Structured response passed through middleware and handlers.
#[derive(Debug)]
pub struct ResponseContext {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    sent: bool,
}

impl ResponseContext {
    /// A fresh, unsent `200 OK` response.
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            sent: false,
        }
    }

    /// Set the status code. Ignored once the body has been sent.
    pub fn status(&mut self, code: StatusCode) -> &mut Self {
        if !self.sent {
            self.status = code;
        }
        self
    }

    /// Set a response header, replacing any previous value.
    ///
    /// Invalid names or values are logged and skipped. Headers should be set
    /// before the body is sent; later calls are ignored.
    pub fn set_header<K, V>(&mut self, name: K, value: V) -> &mut Self
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
    {
        if self.sent {
            tracing::debug!("Ignoring header set after response was sent");
            return self;
        }

        match (name.try_into(), value.try_into()) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::warn!("Ignoring invalid response header"),
        }
        self
    }

    /// Serialize `data` as the JSON body and mark the response sent.
    ///
    /// A no-op if a body was already sent. Serialization errors are returned
    /// and leave the response unsent.
    pub fn json<T>(&mut self, data: &T) -> Result<(), serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        if self.sent {
            return Ok(());
        }
        let body = serde_json::to_vec(data)?;
        self.commit(APPLICATION_JSON, Bytes::from(body));
        Ok(())
    }

    /// Send `text` as a plain-text body and mark the response sent.
    ///
    /// A no-op if a body was already sent.
    pub fn send(&mut self, text: impl Into<String>) {
        if self.sent {
            return;
        }
        self.commit(TEXT_PLAIN, Bytes::from(text.into()));
    }

    fn commit(&mut self, content_type: &'static str, body: Bytes) {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.body = body;
        self.sent = true;
    }

    /// Whether a body has been emitted.
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Build the transport response. An unsent response has an empty body.
    pub fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl Default for ResponseContext {
    fn default() -> Self {
        Self::new()
    }
}
