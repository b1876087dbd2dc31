//! Redirect target normalization and absolute URL construction behind a reverse proxy

use http::{HeaderMap, Uri, header::HOST};

use crate::utils::first_header_value;

pub const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";
pub const FORWARDED_HOST_HEADER: &str = "x-forwarded-host";
pub const FORWARDED_URI_HEADER: &str = "x-forwarded-uri";

/// Turns a caller supplied `next` value into a same-origin path.
///
/// Missing or empty input becomes `/`. Leading runs of `/` and `\` collapse to a single
/// `/`, so protocol-relative targets such as `//evil.example.com` stay on this origin.
pub fn normalize_next(raw: Option<&str>) -> String {
    match raw {
        None | Some("") => "/".to_string(),
        Some(raw) => format!("/{}", raw.trim_start_matches(['/', '\\'])),
    }
}

/// True for `http://` or `https://` URLs, case-insensitively
pub fn is_absolute_http_url(target: &str) -> bool {
    let has_prefix = |prefix: &str| {
        target
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    has_prefix("http://") || has_prefix("https://")
}

/// Scheme reported by the proxy, if any
pub fn forwarded_proto(headers: &HeaderMap) -> Option<&str> {
    first_header_value(headers, FORWARDED_PROTO_HEADER)
}

/// Whether the client reached the proxy over https
pub fn is_secure_request(headers: &HeaderMap) -> bool {
    forwarded_proto(headers).is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}

/// Scheme and host the client used to reach us, as seen through the proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    /// Host precedence: `x-forwarded-host`, `Host`, the request URI authority, then `fallback_host`
    pub fn from_request(headers: &HeaderMap, uri: &Uri, fallback_host: &str) -> Self {
        let scheme = forwarded_proto(headers).unwrap_or("http").to_string();
        let host = first_header_value(headers, FORWARDED_HOST_HEADER)
            .or_else(|| first_header_value(headers, HOST.as_str()))
            .or_else(|| uri.authority().map(|a| a.as_str()))
            .unwrap_or(fallback_host)
            .to_string();
        Self { scheme, host }
    }

    pub fn absolute_url(&self, target: &str) -> String {
        let url = if is_absolute_http_url(target) {
            target.to_string()
        } else if target.starts_with('/') {
            format!("{}://{}{}", self.scheme, self.host, target)
        } else {
            format!("{}://{}/{}", self.scheme, self.host, target)
        };
        escape_location(&url)
    }
}

/// Percent-encodes every byte that may not appear verbatim in a `Location` header
fn escape_location(url: &str) -> String {
    if url.bytes().all(|b| b.is_ascii_graphic()) {
        return url.to_string();
    }
    url.bytes()
        .map(|b| {
            if b.is_ascii_graphic() {
                char::from(b).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect()
}

/// Absolute URL for a `Location` header
pub fn to_absolute_url(headers: &HeaderMap, uri: &Uri, target: &str, fallback_host: &str) -> String {
    RequestOrigin::from_request(headers, uri, fallback_host).absolute_url(target)
}
