//! Routify: a minimal HTTP request router.
//!
//! Matches method + path against registered `:param` patterns, runs global
//! and per-route middleware, parses JSON bodies and writes JSON/text responses.

pub mod config;
pub mod demo;
pub mod error;
pub mod handler;
pub mod http;
pub mod middleware;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use error::{BoxError, ServerError};
pub use handler::{handler, BoxFuture, Handler, HandlerResult};
pub use http::{RequestContext, ResponseContext, Server};
pub use middleware::{middleware, request_logger, Middleware, Next};
pub use routing::{HttpMethod, Router};
