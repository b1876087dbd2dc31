use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use http::header::{HeaderMap, HeaderValue, SET_COOKIE};
use thiserror::Error;

pub(crate) fn base64url_decode(input: &str) -> Result<Vec<u8>, UtilError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(input.trim_end_matches('='))
        .map_err(|_| UtilError::Format("Failed to decode base64url".to_string()))?;
    Ok(decoded)
}

pub(crate) fn base64url_encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Returns the first comma separated element of a header, trimmed.
///
/// Proxies chain `x-forwarded-*` values as `client, proxy1, proxy2`.
pub(crate) fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub(crate) fn header_set_cookie(headers: &mut HeaderMap, cookie: &str) -> Result<(), UtilError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|_| UtilError::Cookie("Failed to parse cookie".to_string()))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Cookie error: {0}")]
    Cookie(String),

    #[error("Invalid format: {0}")]
    Format(String),
}
