//! Common error types for Tunedeck

use thiserror::Error;

/// Common result type for Tunedeck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Tunedeck microservices
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Envelope serialization/deserialization error
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dataset loading error (missing file, missing required column)
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Client-side deadline elapsed with no reply from the service
    #[error("No response from service within {0} ms")]
    Timeout(u64),

    /// Peer closed the connection before a reply arrived
    #[error("Connection closed before a reply arrived")]
    ConnectionClosed,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the failure is the client deadline elapsing.
    ///
    /// Callers must not conflate "service took too long" with a service-side
    /// `{error}` envelope; the latter arrives as a normal decoded response.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}
