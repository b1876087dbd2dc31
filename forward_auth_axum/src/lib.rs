//! forward-auth-axum - Axum endpoints for the forward-auth gatekeeper
//!
//! Mount [`forward_auth_router`] behind a reverse proxy and point the proxy's forward-auth
//! middleware at `/check`. Unauthenticated visitors are redirected to a password form that
//! issues a signed session cookie for the application named by the request.

mod config;
mod error;
mod handlers;
mod pages;
mod redirect;
mod router;
mod session;

pub use config::{CHECK_PATH, HOME_PATH, LOGIN_PATH, LOGOUT_PATH};
pub use error::IntoResponseError;
pub use router::{forward_auth_router, forward_auth_router_no_trace};
pub use session::{AuthSession, RequestIdentity};

pub use forward_auth::{AuthConfig, AuthSettings, ConfigError};
