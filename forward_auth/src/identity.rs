//! Per-request application identity
//!
//! A single gatekeeper instance serves several protected applications. Each one names
//! itself (display name and cookie name) through query parameters or proxy headers, and
//! that identity has to survive every redirect of the login round-trip.

use http::HeaderMap;
use url::form_urlencoded;

pub const APP_QUERY_PARAM: &str = "app";
pub const COOKIE_QUERY_PARAM: &str = "cookie";
pub const NEXT_QUERY_PARAM: &str = "next";

pub const APP_NAME_HEADER: &str = "x-actual-app-name";
pub const COOKIE_NAME_HEADER: &str = "x-actual-cookie-name";

/// Where one identity field may come from, in priority order after the query
#[derive(Clone, Copy)]
struct IdentitySource {
    query_key: &'static str,
    header: &'static str,
    /// Values rejected here count as absent
    accepts: fn(&str) -> bool,
}

const APP_NAME_SOURCE: IdentitySource = IdentitySource {
    query_key: APP_QUERY_PARAM,
    header: APP_NAME_HEADER,
    accepts: |_| true,
};

const COOKIE_NAME_SOURCE: IdentitySource = IdentitySource {
    query_key: COOKIE_QUERY_PARAM,
    header: COOKIE_NAME_HEADER,
    accepts: is_valid_cookie_name,
};

/// RFC 6265 cookie-name token: letters, digits and ``!#$%&'*+-.^_`|~``
pub fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub app_name: String,
    pub cookie_name: String,
}

/// Resolves the effective identity: query parameter, then header, then `defaults`.
///
/// Values are trimmed and an empty value counts as absent.
pub fn resolve_identity(query: Option<&str>, headers: &HeaderMap, defaults: &Identity) -> Identity {
    let params = parse_query(query);
    Identity {
        app_name: resolve_field(&params, headers, APP_NAME_SOURCE, &defaults.app_name),
        cookie_name: resolve_field(&params, headers, COOKIE_NAME_SOURCE, &defaults.cookie_name),
    }
}

fn resolve_field(
    params: &[(String, String)],
    headers: &HeaderMap,
    source: IdentitySource,
    default: &str,
) -> String {
    let accepted = |value: &str| {
        let ok = (source.accepts)(value);
        if !ok {
            tracing::warn!("Ignoring invalid {} value {:?}", source.query_key, value);
        }
        ok
    };
    let from_query = query_value(params, source.query_key).filter(|v| accepted(*v));
    let from_header = || {
        headers
            .get(source.header)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .filter(|v| accepted(*v))
    };

    from_query
        .or_else(from_header)
        .unwrap_or(default)
        .to_string()
}

pub(crate) fn parse_query(query: Option<&str>) -> Vec<(String, String)> {
    query
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// First value for `key`, trimmed; empty counts as absent
pub(crate) fn query_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

impl Identity {
    fn serializer(&self) -> form_urlencoded::Serializer<'static, String> {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !self.app_name.is_empty() {
            serializer.append_pair(APP_QUERY_PARAM, &self.app_name);
        }
        if !self.cookie_name.is_empty() {
            serializer.append_pair(COOKIE_QUERY_PARAM, &self.cookie_name);
        }
        serializer
    }

    /// `?app=..&cookie=..` or an empty string when there is nothing to carry
    pub fn query_suffix(&self) -> String {
        with_question_mark(self.serializer().finish())
    }

    /// Identity parameters followed by `next`, as used for login redirects
    pub fn login_query(&self, next: &str) -> String {
        let mut serializer = self.serializer();
        serializer.append_pair(NEXT_QUERY_PARAM, next);
        with_question_mark(serializer.finish())
    }
}

fn with_question_mark(query: String) -> String {
    if query.is_empty() {
        query
    } else {
        format!("?{query}")
    }
}
