//! Authentication error types.

use thiserror::Error;

/// Errors raised by the auth gate.
///
/// None of the messages include the presented or configured token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header was presented.
    #[error("Authentication required")]
    MissingToken,

    /// The header does not use the `Bearer` scheme.
    #[error("Authorization header must use the Bearer scheme")]
    MalformedHeader,

    /// The bearer token is empty.
    #[error("Bearer token is empty")]
    EmptyToken,

    /// The token does not match any configured entry.
    #[error("Invalid or unknown token")]
    UnknownToken,

    /// The same token is configured twice.
    #[error("Duplicate token entry (client '{0}')")]
    DuplicateToken(String),

    /// A configured token record is unusable.
    #[error("Invalid token record: {0}")]
    InvalidRecord(String),
}
