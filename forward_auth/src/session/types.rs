use serde::{Deserialize, Serialize};

/// Signed part of a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TokenPayload {
    pub(crate) value: String,
    /// Unix epoch milliseconds; `None` never expires
    pub(crate) expiry: Option<i64>,
}
