use http::header::{COOKIE, HeaderMap};

/// Attributes of the session cookie that vary per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieOptions {
    /// Max-Age in seconds
    pub max_age: u64,
    pub secure: bool,
}

/// `Set-Cookie` value carrying a session token
pub fn session_cookie(name: &str, value: &str, options: CookieOptions) -> String {
    let mut cookie = format!(
        "{name}={value}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        options.max_age
    );
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that makes the browser drop the cookie immediately
pub fn clear_cookie(name: &str, secure: bool) -> String {
    session_cookie(name, "", CookieOptions { max_age: 0, secure })
}

/// Finds the value of cookie `name` across all `Cookie` headers.
///
/// Returns `None` when there is no cookie header, no such cookie, or the value is empty.
pub fn get_cookie_from_headers<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let value = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| value.trim())
        });

    match value {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            tracing::debug!("No session cookie '{}' found in cookies", name);
            None
        }
    }
}
