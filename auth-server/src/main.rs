use forward_auth_axum::{AuthConfig, AuthSettings, forward_auth_router};

mod server;

use crate::server::{init_tracing, serve_http};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing(env!("CARGO_CRATE_NAME"));

    let settings = AuthSettings::from_env();
    tracing::debug!("Loaded settings: {:?}", settings);

    let config = match AuthConfig::try_from(settings) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let port = config.port();
    tracing::info!(
        "Protecting '{}' with cookie '{}' by default",
        config.app_name(),
        config.cookie_name()
    );

    if let Err(e) = serve_http(port, forward_auth_router(config)).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
