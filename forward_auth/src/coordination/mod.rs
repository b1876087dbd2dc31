mod auth;
mod errors;

pub use auth::{LoginForm, is_authenticated, login_core, logout_core};
pub use errors::CoordinationError;
