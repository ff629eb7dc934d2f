//! Errors raised while hosting the HTTP server.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Result alias for server lifecycle operations.
pub type ApiServerResult<T> = Result<T, ApiServerError>;

/// Failures of the HTTP listener.
#[derive(Debug, Error)]
pub enum ApiServerError {
    /// The listener could not bind.
    #[error("failed to bind http listener")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The server stopped with an I/O error.
    #[error("http server terminated unexpectedly")]
    Serve {
        /// Underlying I/O error.
        source: io::Error,
    },
}
