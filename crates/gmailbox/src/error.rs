//! Error types for the mailbox layer.

use thiserror::Error;

/// Errors that can occur during mailbox operations.
///
/// Two classes of failure surface from the connection layer: *state* errors
/// ([`Error::State`], [`Error::ConnectionLost`], [`Error::Io`]) mean the
/// connection cannot carry commands at all, while *response* errors
/// ([`Error::No`], [`Error::Bad`]) mean a command executed but the server
/// rejected it. No response decoding is attempted once either is detected.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error during network operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection is not in a state that allows the command
    /// (for example, not authenticated).
    #[error("Invalid connection state: {0}")]
    State(String),

    /// The connection to the server was lost.
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Server returned NO for a command.
    #[error("Server returned NO: {0}")]
    No(String),

    /// Server returned BAD for a command.
    #[error("Server returned BAD: {0}")]
    Bad(String),

    /// Malformed data in a server response or mailbox listing.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
