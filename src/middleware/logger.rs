//! Request logging middleware.

use std::time::Instant;

use super::chain::{middleware, Middleware};

/// Global middleware that logs every request and how it was answered.
///
/// Logs `method`, `path` and `request_id` on the way in, and the final
/// status and latency once the rest of the chain has returned.
pub fn request_logger() -> Middleware {
    middleware(|req, res, next| {
        Box::pin(async move {
            let start = Instant::now();
            let method = req.method().to_string();
            let path = req.path().to_string();
            let request_id = req.request_id().unwrap_or("unknown").to_string();

            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                "Request received"
            );

            let result = next.run(req, res).await;

            tracing::debug!(
                request_id = %request_id,
                status = res.status_code().as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Global middleware finished"
            );
            result
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{RequestContext, ResponseContext};
    use crate::middleware::{run_chain, ChainOutcome};
    use axum::body::Body;
    use axum::http::Request;

    #[tokio::test]
    async fn passes_through() {
        let req = Request::builder()
            .uri("/api/search?q=rust")
            .header("x-request-id", "abc")
            .body(Body::empty())
            .unwrap();
        let mut req = RequestContext::new(req, 1024);
        let mut res = ResponseContext::new();

        let chain = [request_logger()];
        assert_eq!(
            run_chain(&chain, &mut req, &mut res).await,
            ChainOutcome::Completed
        );
        assert!(!res.is_sent());
    }
}
