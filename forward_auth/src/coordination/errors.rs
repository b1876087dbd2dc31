use thiserror::Error;

use crate::session::TokenError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum CoordinationError {
    /// Wrong or missing password. The message is the only detail shown to users.
    #[error("Invalid password")]
    InvalidPassword,

    /// Error from session token operations
    #[error("Session token error: {0}")]
    Token(#[from] TokenError),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl CoordinationError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::InvalidPassword => tracing::warn!("{}", self),
            _ => tracing::error!("{}", self),
        }
        self
    }
}
