//! forward-auth - Signed-cookie gatekeeper core for reverse proxy forward authentication
//!
//! A proxy asks the gatekeeper whether a request may pass. The answer depends only on a
//! stateless HMAC-signed session cookie, so this crate holds no storage: it provides the
//! token codec, the per-request application identity, redirect normalization and the
//! login/logout coordination used by the HTTP layer.

mod config;
mod coordination;
mod identity;
mod links;
mod redirect;
mod session;
mod utils;

pub use config::{
    AuthConfig, AuthSettings, ConfigError, DEFAULT_APP_NAME, DEFAULT_BODY_TIMEOUT_SECS,
    DEFAULT_COOKIE_MAX_AGE, DEFAULT_COOKIE_NAME, DEFAULT_HOME_TITLE, DEFAULT_PORT,
};

pub use coordination::{CoordinationError, LoginForm, is_authenticated, login_core, logout_core};

pub use identity::{
    APP_NAME_HEADER, APP_QUERY_PARAM, COOKIE_NAME_HEADER, COOKIE_QUERY_PARAM, Identity,
    NEXT_QUERY_PARAM, is_valid_cookie_name, resolve_identity,
};

pub use links::{HomeLink, build_home_links};

pub use redirect::{
    FORWARDED_HOST_HEADER, FORWARDED_PROTO_HEADER, FORWARDED_URI_HEADER, RequestOrigin,
    is_absolute_http_url, is_secure_request, normalize_next, to_absolute_url,
};

pub use session::{TokenError, sign_token, sign_token_at, verify_token, verify_token_at};

pub use utils::UtilError;

/// `next` query parameter of a raw query string, normalized into a same-origin path
pub fn next_from_query(query: Option<&str>) -> String {
    let params = identity::parse_query(query);
    normalize_next(params.iter().find(|(k, _)| k == NEXT_QUERY_PARAM).map(|(_, v)| v.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_from_query() {
        assert_eq!(next_from_query(None), "/");
        assert_eq!(next_from_query(Some("app=a&next=%2Fdashboard")), "/dashboard");
        assert_eq!(next_from_query(Some("next=")), "/");
        assert_eq!(next_from_query(Some("next=%2F%2Fevil.com")), "/evil.com");
    }
}
