//! Route handler types.
//!
//! Handlers borrow the request and response for the duration of one call and
//! return a boxed future, so plain functions and closures both work:
//!
//! ```ignore
//! fn hello<'a>(
//!     _req: &'a mut RequestContext,
//!     res: &'a mut ResponseContext,
//! ) -> BoxFuture<'a, HandlerResult> {
//!     Box::pin(async move {
//!         res.json(&json!({ "message": "hello" }))?;
//!         Ok(())
//!     })
//! }
//!
//! let router = Router::new()
//!     .get("/hello", hello)
//!     .get("/inline", |_req, res| Box::pin(async move {
//!         res.send("inline");
//!         Ok(())
//!     }));
//! ```

use std::sync::Arc;

pub use futures_util::future::BoxFuture;

use crate::error::BoxError;
use crate::http::{RequestContext, ResponseContext};

/// Result type for handlers and middleware. `Err` is answered with a 500.
pub type HandlerResult = Result<(), BoxError>;

/// A registered route handler.
pub type Handler = Arc<
    dyn for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync,
>;

/// Box a handler function or closure.
pub fn handler<F>(f: F) -> Handler
where
    F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}
