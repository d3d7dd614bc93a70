//! Per-request dispatch.
//!
//! # Request Lifecycle
//! ```text
//! Received
//!     → GlobalMiddleware   (Failed → 500 "Middleware Error")
//!     → RouteLookup        (no match → 404 "Not Found")
//!     → RouteMiddleware    (Failed → 500 "Route Middleware Error", Halted → done)
//!     → BodyParse          (POST / PUT / PATCH only)
//!     → Handler            (Err or panic → 500 "Internal Server Error")
//!     → Responded
//! ```
//!
//! # Design Decisions
//! - Every request gets exactly one response, whatever the handlers do
//! - Errors are recovered closest to their source: chain first, then here
//! - The route table is read-only once a `Dispatcher` exists

use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use futures_util::FutureExt;
use serde_json::json;

use crate::handler::HandlerResult;
use crate::http::{RequestContext, ResponseContext};
use crate::middleware::chain::panic_message;
use crate::middleware::{run_chain, ChainOutcome, Middleware};
use crate::observability::metrics;
use crate::routing::router::{RouteTable, Router};

/// Methods whose body is parsed before the handler runs.
const BODY_METHODS: &[&str] = &["POST", "PUT", "PATCH"];

/// Frozen router: dispatches requests against an immutable route table.
pub struct Dispatcher {
    routes: RouteTable,
    global: Vec<Middleware>,
    body_limit: usize,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes)
            .field("global_middlewares", &self.global.len())
            .field("body_limit", &self.body_limit)
            .finish()
    }
}

impl Dispatcher {
    /// Freeze `router`. `body_limit` caps request bodies read by `parse_body`.
    pub fn new(router: Router, body_limit: usize) -> Self {
        let (routes, global) = router.into_parts();
        tracing::info!(
            routes = routes.len(),
            global_middlewares = global.len(),
            "Route table frozen"
        );
        Self {
            routes,
            global,
            body_limit,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Handle one request from start to finish.
    pub async fn dispatch(&self, request: Request<Body>) -> Response<Body> {
        let start_time = Instant::now();
        let mut req = RequestContext::new(request, self.body_limit);
        let mut res = ResponseContext::new();

        let method = req.method().to_string();
        let path = req.path().to_string();
        let request_id = req.request_id().unwrap_or("unknown").to_string();

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            "Dispatching request"
        );

        let matched = match AssertUnwindSafe(self.handle(&mut req, &mut res))
            .catch_unwind()
            .await
        {
            Ok(Ok(matched)) => matched,
            Ok(Err(e)) => {
                tracing::error!(request_id = %request_id, error = %e, "Request handler error");
                reply_error(&mut res, StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
                None
            }
            Err(panic) => {
                tracing::error!(
                    request_id = %request_id,
                    panic = panic_message(&*panic),
                    "Request handler panicked"
                );
                reply_error(&mut res, StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
                None
            }
        };

        let status = res.status_code().as_u16();
        metrics::record_request(
            &method,
            status,
            matched.as_deref().unwrap_or("none"),
            start_time,
        );
        tracing::debug!(
            request_id = %request_id,
            status,
            sent = res.is_sent(),
            "Request complete"
        );

        res.into_response()
    }

    /// Run the lifecycle. Returns the matched route pattern, if any, for metrics.
    async fn handle(
        &self,
        req: &mut RequestContext,
        res: &mut ResponseContext,
    ) -> Result<Option<String>, crate::error::BoxError> {
        // A halted global chain still proceeds to lookup; a response it
        // already sent makes the later writes no-ops.
        match run_chain(&self.global, req, res).await {
            ChainOutcome::Completed | ChainOutcome::Halted => {}
            ChainOutcome::Failed => {
                reply_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Middleware Error");
                return Ok(None);
            }
        }

        let Some((route, params)) = self.routes.lookup(req.method(), req.path()) else {
            tracing::warn!(method = %req.method(), path = %req.path(), "No route matched");
            reply_error(res, StatusCode::NOT_FOUND, "Not Found");
            return Ok(None);
        };
        let pattern = route.pattern().as_str().to_string();

        req.params = params;
        req.query = parse_query(req.uri().query());

        match run_chain(route.middlewares(), req, res).await {
            ChainOutcome::Completed => {}
            ChainOutcome::Halted => return Ok(Some(pattern)),
            ChainOutcome::Failed => {
                reply_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Route Middleware Error");
                return Ok(Some(pattern));
            }
        }

        if BODY_METHODS.contains(&req.method()) {
            req.parse_body().await;
        }

        let result: HandlerResult = (route.handler())(req, res).await;
        result?;
        Ok(Some(pattern))
    }
}

/// Decode a query string into a map. Later duplicates overwrite earlier ones.
pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

fn reply_error(res: &mut ResponseContext, status: StatusCode, message: &str) {
    if let Err(e) = res.status(status).json(&json!({ "error": message })) {
        tracing::error!(error = %e, "Failed to serialize error response");
    }
}
