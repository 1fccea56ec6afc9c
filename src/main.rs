mod models;
mod handlers;
mod services;
mod middleware;
mod views;
mod routes;
mod config;
mod errors;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use crate::{config::Config, services::ApiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    let api = ApiClient::new(&config.api.base_url).context("Failed to build API client")?;
    tracing::info!("Using task API at {}", config.api.base_url);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = routes::build_router(api, config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;
    Ok(())
}
