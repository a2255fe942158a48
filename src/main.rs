use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ccms::backend::HttpBackendClient;
use ccms::config::ProxyConfig;
use ccms::routes::router;
use ccms::session::CookieSettings;
use ccms::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "ccms=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ProxyConfig::new_from_env()?;
    let backend = HttpBackendClient::new(config.endpoints.clone())?;

    let state = AppState {
        backend: Arc::new(backend),
        cookies: CookieSettings {
            secure: config.secure_cookies,
        },
    };

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
