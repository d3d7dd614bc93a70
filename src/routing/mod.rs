//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Router::new().use_middleware(..).get(..).post(..)
//!     → router.rs (append routes in registration order)
//!     → Dispatcher::new (freeze as immutable table)
//!
//! Per request:
//!     Incoming Request (method, path, query)
//!     → dispatcher.rs (lifecycle, error backstop)
//!     → router.rs (first route with equal method + matching path)
//!     → matcher.rs (segment match, bind :params)
//!     → Return: matched Route + params, or NoMatch (404)
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No regex or wildcards (`:param` segments only)
//! - Deterministic: first registered match wins

pub mod dispatcher;
pub mod matcher;
pub mod router;

pub use dispatcher::Dispatcher;
pub use matcher::{extract_params, PathPattern};
pub use router::{HttpMethod, Route, RouteTable, Router};
