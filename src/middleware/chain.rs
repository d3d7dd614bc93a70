//! Ordered middleware execution.
//!
//! # Responsibilities
//! - Walk a middleware slice in registration order
//! - Hand each middleware a `Next` continuation for the rest of the chain
//! - Report whether the walk completed, halted or failed
//!
//! # Design Decisions
//! - `Next` is consumed by `run`, so the cursor advances at most once per middleware
//! - Not calling `next` halts the chain; nothing after that middleware runs
//! - Errors and panics are contained here and reported as `ChainOutcome::Failed`

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::FutureExt;

use crate::handler::{BoxFuture, HandlerResult};
use crate::http::{RequestContext, ResponseContext};

/// A registered middleware function.
///
/// Cheap to clone, so one middleware can guard several routes.
pub type Middleware = Arc<
    dyn for<'a> Fn(
            &'a mut RequestContext,
            &'a mut ResponseContext,
            Next<'a>,
        ) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync,
>;

/// Box a middleware function or closure.
///
/// ```ignore
/// let auth = middleware(|req, res, next| Box::pin(async move {
///     if req.header("Authorization").is_none() {
///         res.status(StatusCode::UNAUTHORIZED).json(&json!({ "error": "Unauthorized" }))?;
///         return Ok(());
///     }
///     next.run(req, res).await
/// }));
/// ```
pub fn middleware<F>(f: F) -> Middleware
where
    F: for<'a> Fn(
            &'a mut RequestContext,
            &'a mut ResponseContext,
            Next<'a>,
        ) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Continuation handed to a middleware: the remainder of its chain.
pub struct Next<'a> {
    rest: &'a [Middleware],
    completed: &'a AtomicBool,
}

impl<'a> Next<'a> {
    /// Run the remaining middleware.
    ///
    /// Resolves once the rest of the chain has finished, so code after
    /// `.await` runs after every later middleware.
    pub fn run<'b>(
        self,
        req: &'b mut RequestContext,
        res: &'b mut ResponseContext,
    ) -> BoxFuture<'b, HandlerResult>
    where
        'a: 'b,
    {
        match self.rest.split_first() {
            Some((current, rest)) => current(
                req,
                res,
                Next {
                    rest,
                    completed: self.completed,
                },
            ),
            None => {
                self.completed.store(true, Ordering::Release);
                Box::pin(async { Ok(()) })
            }
        }
    }
}

/// How a chain walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Every middleware called `next`.
    Completed,
    /// A middleware returned without calling `next`.
    Halted,
    /// A middleware returned an error or panicked.
    Failed,
}

/// Walk `chain` in order against one request.
pub async fn run_chain(
    chain: &[Middleware],
    req: &mut RequestContext,
    res: &mut ResponseContext,
) -> ChainOutcome {
    let completed = AtomicBool::new(false);
    let next = Next {
        rest: chain,
        completed: &completed,
    };

    match AssertUnwindSafe(next.run(req, res)).catch_unwind().await {
        Ok(Ok(())) if completed.load(Ordering::Acquire) => ChainOutcome::Completed,
        Ok(Ok(())) => ChainOutcome::Halted,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Middleware error");
            ChainOutcome::Failed
        }
        Err(panic) => {
            tracing::error!(panic = panic_message(&*panic), "Middleware panicked");
            ChainOutcome::Failed
        }
    }
}

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
