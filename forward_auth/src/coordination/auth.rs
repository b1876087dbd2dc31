use http::HeaderMap;
use url::form_urlencoded;

use crate::config::AuthConfig;
use crate::identity::{Identity, NEXT_QUERY_PARAM};
use crate::redirect::{is_secure_request, normalize_next};
use crate::session::{
    CookieOptions, clear_cookie, get_cookie_from_headers, session_cookie, sign_token, verify_token,
};
use crate::utils::header_set_cookie;

use super::errors::CoordinationError;

/// Value stored in every session token; possession of a valid token is the whole session
const SESSION_VALUE: &str = "1";

/// Submitted login form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub password: Option<String>,
    /// Already normalized redirect target
    pub next: String,
}

impl LoginForm {
    /// Parses a form-urlencoded body.
    ///
    /// Parsing never fails: undecodable input simply yields no password.
    pub fn from_body(body: &[u8]) -> Self {
        let mut password = None;
        let mut next = None;
        for (key, value) in form_urlencoded::parse(body) {
            match key.as_ref() {
                "password" if password.is_none() => password = Some(value.into_owned()),
                NEXT_QUERY_PARAM if next.is_none() => next = Some(value.into_owned()),
                _ => {}
            }
        }
        Self {
            password,
            next: normalize_next(next.as_deref()),
        }
    }
}

/// Whether the request carries a valid session cookie for `identity`
pub fn is_authenticated(config: &AuthConfig, headers: &HeaderMap, identity: &Identity) -> bool {
    let Some(token) = get_cookie_from_headers(headers, &identity.cookie_name) else {
        return false;
    };

    let authenticated = verify_token(token, config.secret()).is_some_and(|v| !v.is_empty());
    tracing::debug!(
        "Session cookie '{}' for '{}' valid: {}",
        identity.cookie_name,
        identity.app_name,
        authenticated
    );
    authenticated
}

/// Checks the submitted password and returns the headers setting a fresh session cookie
#[tracing::instrument(skip_all, fields(app = %identity.app_name, cookie = %identity.cookie_name))]
pub fn login_core(
    config: &AuthConfig,
    headers: &HeaderMap,
    identity: &Identity,
    form: &LoginForm,
) -> Result<HeaderMap, CoordinationError> {
    let password = form.password.as_deref().unwrap_or_default();
    if !config.verify_password(password) {
        return Err(CoordinationError::InvalidPassword.log());
    }

    let max_age = config.cookie_max_age();
    let token = sign_token(SESSION_VALUE, max_age.saturating_mul(1000), config.secret())?;
    let cookie = session_cookie(
        &identity.cookie_name,
        &token,
        CookieOptions {
            max_age,
            secure: use_secure_cookie(config, headers),
        },
    );

    let mut response_headers = HeaderMap::new();
    header_set_cookie(&mut response_headers, &cookie).map_err(|e| CoordinationError::from(e).log())?;

    tracing::info!("Login succeeded, redirecting to {}", form.next);
    Ok(response_headers)
}

/// Headers replacing the session cookie with an immediately expired empty one
pub fn logout_core(
    config: &AuthConfig,
    headers: &HeaderMap,
    identity: &Identity,
) -> Result<HeaderMap, CoordinationError> {
    let cookie = clear_cookie(&identity.cookie_name, use_secure_cookie(config, headers));

    let mut response_headers = HeaderMap::new();
    header_set_cookie(&mut response_headers, &cookie).map_err(|e| CoordinationError::from(e).log())?;

    tracing::debug!("Cleared session cookie '{}'", identity.cookie_name);
    Ok(response_headers)
}

fn use_secure_cookie(config: &AuthConfig, headers: &HeaderMap) -> bool {
    config.secure_cookies() || is_secure_request(headers)
}
