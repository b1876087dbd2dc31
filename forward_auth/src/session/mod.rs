mod cookie;
mod errors;
mod token;
mod types;

pub use cookie::{CookieOptions, clear_cookie, get_cookie_from_headers, session_cookie};
pub use errors::TokenError;
pub use token::{sign_token, sign_token_at, verify_token, verify_token_at};
