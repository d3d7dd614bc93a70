//! Middleware subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher
//!     → chain.rs (global chain walk)
//!     → [route lookup]
//!     → chain.rs (route chain walk, fresh cursor)
//!     → Completed | Halted | Failed back to the dispatcher
//! ```
//!
//! # Design Decisions
//! - A middleware is `(request, response, next)`; calling `next.run` continues the chain
//! - Each walk owns its own cursor; global and route chains never share one
//! - Failures stop at the chain boundary and become `ChainOutcome::Failed`

pub mod chain;
pub mod logger;

pub use chain::{middleware, run_chain, ChainOutcome, Middleware, Next};
pub use logger::request_logger;
