//! Demonstration application.
//!
//! The routes served by the `routify` binary:
//!
//! | Method | Path                  | Notes                                  |
//! |--------|-----------------------|----------------------------------------|
//! | GET    | `/api/testingroutify` | fixed greeting                         |
//! | GET    | `/api/users/:id`      | requires an `Authorization` header     |
//! | GET    | `/api/search`         | echoes the `q` and `sort` query params |
//! | POST   | `/api/users`          | echoes the JSON body with 201          |

use axum::http::StatusCode;
use serde_json::json;

use crate::handler::{BoxFuture, HandlerResult};
use crate::http::{RequestContext, ResponseContext};
use crate::middleware::{middleware, request_logger, Middleware};
use crate::routing::Router;

/// Rejects requests without an `Authorization` header with 401.
pub fn require_authorization() -> Middleware {
    middleware(|req, res, next| {
        Box::pin(async move {
            if req.header("Authorization").is_none() {
                tracing::debug!(path = %req.path(), "Missing Authorization header");
                res.status(StatusCode::UNAUTHORIZED)
                    .json(&json!({ "error": "Unauthorized" }))?;
                return Ok(());
            }
            next.run(req, res).await
        })
    })
}

fn testing_routify<'a>(
    _req: &'a mut RequestContext,
    res: &'a mut ResponseContext,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        res.json(&json!({ "message": "Testing Routify!" }))?;
        Ok(())
    })
}

fn get_user<'a>(
    req: &'a mut RequestContext,
    res: &'a mut ResponseContext,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        res.json(&json!({
            "userId": req.param("id"),
            "data": "User data here",
        }))?;
        Ok(())
    })
}

fn search<'a>(
    req: &'a mut RequestContext,
    res: &'a mut ResponseContext,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        res.json(&json!({
            "message": "Search results",
            "searchTerm": req.query_param("q"),
            "sortOrder": req.query_param("sort"),
        }))?;
        Ok(())
    })
}

fn create_user<'a>(
    req: &'a mut RequestContext,
    res: &'a mut ResponseContext,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        let user = req.parse_body().await.clone();
        res.status(StatusCode::CREATED).json(&json!({
            "message": "User created",
            "user": user,
        }))?;
        Ok(())
    })
}

/// Build the demonstration router.
pub fn app() -> Router {
    Router::new()
        .use_middleware(request_logger())
        .get("/api/testingroutify", testing_routify)
        .get_with("/api/users/:id", [require_authorization()], get_user)
        .get("/api/search", search)
        .post("/api/users", create_user)
}

/// Example commands printed once the demo server is listening.
pub fn usage(port: u16) -> Vec<String> {
    let base = format!("http://localhost:{port}");
    vec![
        format!("curl {base}/api/testingroutify"),
        format!("curl {base}/api/users/123"),
        format!("curl \"{base}/api/search?q=typescript&sort=desc\""),
        format!("curl -H \"Authorization: Bearer token\" {base}/api/users/123"),
        format!(
            "curl -X POST -H \"Content-Type: application/json\" -d '{{\"name\":\"Les\"}}' {base}/api/users"
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_four_routes() {
        assert_eq!(app().routes().len(), 4);
    }

    #[test]
    fn usage_uses_port() {
        let lines = usage(4000);
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.contains("localhost:4000")));
    }
}
