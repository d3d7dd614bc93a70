//! Crate-wide error types.

use thiserror::Error;

/// Error type returned by handlers and middleware.
///
/// Anything that implements `std::error::Error` converts into it with `?`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while binding or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind the listening socket.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The accept loop or the listener failed after binding.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}
