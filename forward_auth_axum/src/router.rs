//! Combined router for all gatekeeper endpoints

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::LatencyUnit;
use tower_http::timeout::RequestBodyTimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use forward_auth::AuthConfig;

use crate::config::{CHECK_PATH, HOME_PATH, LOGIN_PATH, LOGOUT_PATH};
use crate::handlers::{
    check, home, login_page, login_page_head, login_submit, logout, not_found,
};

/// Create the router for all gatekeeper endpoints
///
/// The endpoints will be available at:
/// - `GET|HEAD /` home page
/// - `GET /check` forward-auth decision for the reverse proxy
/// - `GET|HEAD|POST /auth/login` password form and submission
/// - `POST /auth/logout`
///
/// Every other path or method answers 404.
pub fn forward_auth_router(config: AuthConfig) -> Router {
    forward_auth_router_no_trace(config).layer(
        TraceLayer::new_for_http()
            // Cookie headers carry session tokens
            .make_span_with(
                DefaultMakeSpan::new()
                    .level(Level::INFO)
                    .include_headers(false),
            )
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Create the router for all gatekeeper endpoints without HTTP tracing
///
/// This is the same as `forward_auth_router()` but without the HTTP tracing middleware.
/// Use this if you want to add your own tracing middleware.
pub fn forward_auth_router_no_trace(config: AuthConfig) -> Router {
    let body_timeout = Duration::from_secs(config.body_timeout_secs());

    Router::new()
        .route(HOME_PATH, get(home).fallback(not_found))
        .route(
            CHECK_PATH,
            get(check).head(not_found).fallback(not_found),
        )
        .route(
            LOGIN_PATH,
            get(login_page)
                .head(login_page_head)
                .post(login_submit)
                .fallback(not_found),
        )
        .route(LOGOUT_PATH, post(logout).fallback(not_found))
        .fallback(not_found)
        .layer(RequestBodyTimeoutLayer::new(body_timeout))
        .with_state(Arc::new(config))
}
