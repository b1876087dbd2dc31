//! Route paths served by the gatekeeper

pub const HOME_PATH: &str = "/";
pub const CHECK_PATH: &str = "/check";
pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";

pub(crate) const NOT_FOUND_BODY: &str = "Not found";
pub(crate) const INVALID_PASSWORD_MESSAGE: &str = "Invalid password";
