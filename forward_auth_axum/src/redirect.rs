use axum::response::{IntoResponse, Response};
use http::{HeaderMap, HeaderValue, StatusCode, Uri, header::LOCATION};

use forward_auth::{AuthConfig, to_absolute_url};

/// 302 to `target`, made absolute against the origin the client used
pub(crate) fn found(config: &AuthConfig, headers: &HeaderMap, uri: &Uri, target: &str) -> Response {
    found_with_headers(config, headers, uri, target, HeaderMap::new())
}

/// [`found`] plus extra headers such as `Set-Cookie`
pub(crate) fn found_with_headers(
    config: &AuthConfig,
    headers: &HeaderMap,
    uri: &Uri,
    target: &str,
    extra: HeaderMap,
) -> Response {
    let location = to_absolute_url(headers, uri, target, &config.fallback_host());
    tracing::debug!("Redirecting to {}", location);
    location_response(&location, extra)
}

/// Extra headers are only sent along with a successful redirect
fn location_response(location: &str, extra: HeaderMap) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = (StatusCode::FOUND, [(LOCATION, value)]).into_response();
            response.headers_mut().extend(extra);
            response
        }
        Err(e) => {
            tracing::error!("Invalid redirect location {:?}: {}", location, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect location").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::SET_COOKIE;

    fn cookie_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SET_COOKIE, HeaderValue::from_static("a=1; Path=/"));
        headers
    }

    #[test]
    fn test_redirect_carries_extra_headers() {
        let response = location_response("http://auth/next", cookie_headers());
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "http://auth/next");
        assert_eq!(response.headers()[SET_COOKIE], "a=1; Path=/");
    }

    #[test]
    fn test_failed_redirect_drops_extra_headers() {
        let response = location_response("http://auth/\nnext", cookie_headers());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert!(response.headers().get(LOCATION).is_none());
    }
}
