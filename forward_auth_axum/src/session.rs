use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use http::request::Parts;

use forward_auth::{AuthConfig, Identity, is_authenticated, resolve_identity};

/// Application identity named by the request, falling back to the configured defaults
#[derive(Clone, Debug)]
pub struct RequestIdentity(pub Identity);

impl<S> FromRequestParts<S> for RequestIdentity
where
    Arc<AuthConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AuthConfig>::from_ref(state);
        let identity = resolve_identity(
            parts.uri.query(),
            &parts.headers,
            &config.default_identity(),
        );
        Ok(Self(identity))
    }
}

/// Session state of the request for the application it names
///
/// Unlike an authenticated-user extractor this never rejects: the handlers decide whether
/// an anonymous request is redirected, denied or served a form.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get};
/// use forward_auth_axum::{AuthConfig, AuthSession};
/// use std::sync::Arc;
///
/// async fn whoami(session: AuthSession) -> String {
///     format!("{}: {}", session.identity.app_name, session.authenticated)
/// }
///
/// fn app(config: AuthConfig) -> Router {
///     Router::new()
///         .route("/whoami", get(whoami))
///         .with_state(Arc::new(config))
/// }
/// ```
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub identity: Identity,
    /// Whether the request carries a valid session cookie for `identity`
    pub authenticated: bool,
}

impl<S> FromRequestParts<S> for AuthSession
where
    Arc<AuthConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AuthConfig>::from_ref(state);
        let RequestIdentity(identity) = RequestIdentity::from_request_parts(parts, state).await?;
        let authenticated = is_authenticated(&config, &parts.headers, &identity);
        Ok(Self {
            identity,
            authenticated,
        })
    }
}
