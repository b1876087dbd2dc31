use thiserror::Error;

use crate::utils::UtilError;

/// Reasons a session token is rejected.
///
/// These never leave the codec: verification reports them through `tracing` and
/// answers "invalid".
#[derive(Debug, Error, Clone)]
pub enum TokenError {
    #[error("No session token")]
    Missing,

    #[error("Invalid token format: {0}")]
    Format(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Token signature mismatch")]
    Signature,

    #[error("Invalid token payload: {0}")]
    Payload(String),

    #[error("Session token expired at {0}")]
    Expired(i64),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
