//! Central configuration for the forward_auth crate
//!
//! Raw values are collected into [`AuthSettings`] (from the process environment or any
//! string map) and validated once into an immutable [`AuthConfig`], which is then shared
//! read-only by every request.

use std::collections::BTreeMap;
use std::fmt;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::identity::{Identity, is_valid_cookie_name};
use crate::links::{HomeLink, build_home_links};

pub const DEFAULT_COOKIE_NAME: &str = "actual-auth";
pub const DEFAULT_APP_NAME: &str = "Actual Service";
pub const DEFAULT_HOME_TITLE: &str = "Actual Automation Stack";

/// Default cookie lifetime: one day
pub const DEFAULT_COOKIE_MAX_AGE: u64 = 24 * 60 * 60;
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_BODY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ACTUAL_PASSWORD must be provided to start the auth server")]
    MissingPassword,
}

/// Unvalidated configuration values
#[derive(Clone, Default)]
pub struct AuthSettings {
    pub password: Option<String>,
    pub session_secret: Option<String>,
    pub cookie_name: Option<String>,
    pub app_name: Option<String>,
    pub cookie_max_age: Option<u64>,
    pub secure_cookies: bool,
    pub home_title: Option<String>,
    pub home_links: Vec<HomeLink>,
    pub port: Option<u16>,
    pub body_timeout_secs: Option<u64>,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "session_secret",
                &self.session_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("cookie_name", &self.cookie_name)
            .field("app_name", &self.app_name)
            .field("cookie_max_age", &self.cookie_max_age)
            .field("secure_cookies", &self.secure_cookies)
            .field("home_title", &self.home_title)
            .field("home_links", &self.home_links)
            .field("port", &self.port)
            .field("body_timeout_secs", &self.body_timeout_secs)
            .finish()
    }
}

impl AuthSettings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        let env: BTreeMap<String, String> = std::env::vars().collect();
        Self::from_env_map(&env)
    }

    /// Read settings from a flat string map using the environment variable names
    pub fn from_env_map(env: &BTreeMap<String, String>) -> Self {
        Self {
            password: non_empty(env, "ACTUAL_PASSWORD").map(str::to_string),
            session_secret: non_empty(env, "SESSION_SECRET").map(str::to_string),
            cookie_name: non_empty(env, "AUTH_COOKIE_NAME")
                .map(str::trim)
                .filter(|name| {
                    let valid = is_valid_cookie_name(name);
                    if !valid {
                        tracing::warn!("Ignoring invalid AUTH_COOKIE_NAME {name:?}, using default");
                    }
                    valid
                })
                .map(str::to_string),
            app_name: non_empty(env, "AUTH_APP_NAME").map(|s| s.trim().to_string()),
            cookie_max_age: parse_number(env, "AUTH_COOKIE_MAX_AGE"),
            secure_cookies: parse_flag(env, "AUTH_SECURE_COOKIES"),
            home_title: non_empty(env, "STACK_HOME_TITLE").map(|s| s.trim().to_string()),
            home_links: build_home_links(env),
            port: parse_number(env, "PORT"),
            body_timeout_secs: parse_number(env, "AUTH_BODY_TIMEOUT_SECS"),
        }
    }
}

fn non_empty<'a>(env: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(env: &BTreeMap<String, String>, key: &str) -> Option<T> {
    let raw = non_empty(env, key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring invalid value for {key}: {raw:?}, using default");
            None
        }
    }
}

fn parse_flag(env: &BTreeMap<String, String>, key: &str) -> bool {
    non_empty(env, key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Validated, immutable configuration shared by all requests
#[derive(Clone)]
pub struct AuthConfig {
    password: String,
    secret: Vec<u8>,
    cookie_name: String,
    app_name: String,
    cookie_max_age: u64,
    secure_cookies: bool,
    home_title: String,
    home_links: Vec<HomeLink>,
    port: u16,
    body_timeout_secs: u64,
}

impl TryFrom<AuthSettings> for AuthConfig {
    type Error = ConfigError;

    fn try_from(settings: AuthSettings) -> Result<Self, Self::Error> {
        let password = settings
            .password
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingPassword)?;

        let secret = match settings.session_secret.filter(|s| !s.is_empty()) {
            Some(secret) => secret.into_bytes(),
            None => derive_secret(&password),
        };

        Ok(Self {
            password,
            secret,
            cookie_name: settings
                .cookie_name
                .filter(|s| is_valid_cookie_name(s))
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            app_name: settings
                .app_name
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            cookie_max_age: settings.cookie_max_age.unwrap_or(DEFAULT_COOKIE_MAX_AGE),
            secure_cookies: settings.secure_cookies,
            home_title: settings
                .home_title
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_HOME_TITLE.to_string()),
            home_links: settings.home_links,
            port: settings.port.unwrap_or(DEFAULT_PORT),
            body_timeout_secs: settings
                .body_timeout_secs
                .unwrap_or(DEFAULT_BODY_TIMEOUT_SECS),
        })
    }
}

/// Signing key used when no SESSION_SECRET is configured: the hex SHA-256 of the password
fn derive_secret(password: &str) -> Vec<u8> {
    hex::encode(Sha256::digest(password.as_bytes())).into_bytes()
}

impl AuthConfig {
    /// Constant time comparison against the shared password
    pub fn verify_password(&self, candidate: &str) -> bool {
        candidate.as_bytes().ct_eq(self.password.as_bytes()).into()
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Identity used when neither the query nor the headers name one
    pub fn default_identity(&self) -> Identity {
        Identity {
            app_name: self.app_name.clone(),
            cookie_name: self.cookie_name.clone(),
        }
    }

    /// Cookie lifetime in seconds
    pub fn cookie_max_age(&self) -> u64 {
        self.cookie_max_age
    }

    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    pub fn home_title(&self) -> &str {
        &self.home_title
    }

    pub fn home_links(&self) -> &[HomeLink] {
        &self.home_links
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn body_timeout_secs(&self) -> u64 {
        self.body_timeout_secs
    }

    /// Host used for absolute redirect URLs when the request names none
    pub fn fallback_host(&self) -> String {
        format!("localhost:{}", self.port)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("password", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("cookie_name", &self.cookie_name)
            .field("app_name", &self.app_name)
            .field("cookie_max_age", &self.cookie_max_age)
            .field("secure_cookies", &self.secure_cookies)
            .field("home_title", &self.home_title)
            .field("home_links", &self.home_links)
            .field("port", &self.port)
            .field("body_timeout_secs", &self.body_timeout_secs)
            .finish()
    }
}
