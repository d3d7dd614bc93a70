//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → [routing dispatcher]
//!         → request.rs (RequestContext: headers, params, query, lazy body)
//!         → response.rs (ResponseContext: status, headers, one body)
//!     → Send to client
//! ```

pub mod request;
pub mod request_id;
pub mod response;
pub mod server;

pub use request::RequestContext;
pub use request_id::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::ResponseContext;
pub use server::Server;
