use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use http::{HeaderMap, Method, StatusCode, Uri, header::CONTENT_TYPE};

use forward_auth::{
    AuthConfig, CoordinationError, FORWARDED_URI_HEADER, LoginForm, login_core, logout_core,
    next_from_query, normalize_next,
};

use crate::config::{INVALID_PASSWORD_MESSAGE, LOGIN_PATH, NOT_FOUND_BODY};
use crate::error::IntoResponseError;
use crate::pages::{render_home, render_login};
use crate::redirect::{found, found_with_headers};
use crate::session::{AuthSession, RequestIdentity};

/// Landing page for signed-in visitors, login redirect for everyone else
pub(crate) async fn home(
    State(config): State<Arc<AuthConfig>>,
    method: Method,
    headers: HeaderMap,
    uri: Uri,
    session: AuthSession,
) -> Result<Response, (StatusCode, String)> {
    if !session.authenticated {
        let target = format!("{LOGIN_PATH}{}", session.identity.login_query("/"));
        return Ok(found(&config, &headers, &uri, &target));
    }

    if method == Method::HEAD {
        return Ok(StatusCode::OK.into_response());
    }

    Ok(render_home(&config, &session.identity)?.into_response())
}

/// Forward-auth decision: 200 lets the proxy pass the request, anything else denies it
pub(crate) async fn check(
    State(config): State<Arc<AuthConfig>>,
    headers: HeaderMap,
    uri: Uri,
    session: AuthSession,
) -> Response {
    if session.authenticated {
        tracing::debug!("Access granted for {}", session.identity.app_name);
        return (StatusCode::OK, "OK").into_response();
    }

    let original = headers
        .get(FORWARDED_URI_HEADER)
        .and_then(|h| h.to_str().ok());
    let next = normalize_next(original);
    tracing::debug!(
        "Access denied for {}, sending to login with next={}",
        session.identity.app_name,
        next
    );

    let target = format!("{LOGIN_PATH}{}", session.identity.login_query(&next));
    found(&config, &headers, &uri, &target)
}

pub(crate) async fn login_page(
    RequestIdentity(identity): RequestIdentity,
    uri: Uri,
) -> Result<Response, (StatusCode, String)> {
    let next = next_from_query(uri.query());
    Ok(render_login(&identity, &next, None)?.into_response())
}

pub(crate) async fn login_page_head() -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, "text/html; charset=utf-8")]).into_response()
}

/// Password submission; the body is read whole and parsed as a form whatever its content type
pub(crate) async fn login_submit(
    State(config): State<Arc<AuthConfig>>,
    RequestIdentity(identity): RequestIdentity,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<Response, (StatusCode, String)> {
    let form = LoginForm::from_body(&body);

    match login_core(&config, &headers, &identity, &form) {
        Ok(cookie_headers) => Ok(found_with_headers(
            &config,
            &headers,
            &uri,
            &form.next,
            cookie_headers,
        )),
        Err(CoordinationError::InvalidPassword) => {
            let page = render_login(&identity, &form.next, Some(INVALID_PASSWORD_MESSAGE))?;
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err::<Response, _>(e).into_response_error(),
    }
}

pub(crate) async fn logout(
    State(config): State<Arc<AuthConfig>>,
    RequestIdentity(identity): RequestIdentity,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, (StatusCode, String)> {
    let cookie_headers = logout_core(&config, &headers, &identity).into_response_error()?;
    let target = format!("{LOGIN_PATH}{}", identity.query_suffix());
    Ok(found_with_headers(
        &config,
        &headers,
        &uri,
        &target,
        cookie_headers,
    ))
}

pub(crate) async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}
