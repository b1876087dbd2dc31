use askama::Template;
use axum::response::Html;
use http::StatusCode;

use forward_auth::{AuthConfig, HomeLink, Identity};

use crate::config::{LOGIN_PATH, LOGOUT_PATH};
use crate::error::IntoResponseError;

#[derive(Template)]
#[template(path = "login.j2", escape = "html")]
struct LoginTemplate<'a> {
    app_name: &'a str,
    error: Option<&'a str>,
    next: &'a str,
    form_action: &'a str,
}

#[derive(Template)]
#[template(path = "home.j2", escape = "html")]
struct HomeTemplate<'a> {
    title: &'a str,
    links: &'a [HomeLink],
    logout_action: &'a str,
}

/// Password form for `identity`, posting back to the login path with the identity preserved
pub(crate) fn render_login(
    identity: &Identity,
    next: &str,
    error: Option<&str>,
) -> Result<Html<String>, (StatusCode, String)> {
    let form_action = format!("{LOGIN_PATH}{}", identity.query_suffix());
    let template = LoginTemplate {
        app_name: &identity.app_name,
        error,
        next,
        form_action: &form_action,
    };
    Ok(Html(template.render().into_response_error()?))
}

/// Landing page listing the configured stack links
pub(crate) fn render_home(
    config: &AuthConfig,
    identity: &Identity,
) -> Result<Html<String>, (StatusCode, String)> {
    let logout_action = format!("{LOGOUT_PATH}{}", identity.query_suffix());
    let template = HomeTemplate {
        title: config.home_title(),
        links: config.home_links(),
        logout_action: &logout_action,
    };
    Ok(Html(template.render().into_response_error()?))
}
