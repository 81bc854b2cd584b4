use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use truthline::pipeline::DuckDuckGoBackend;
use truthline::Settings;

mod api;

use api::{AppState, OpenAiProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let settings = Settings::from_env()?;
    if settings.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; analysis requests will fail");
    }

    let state = AppState {
        default_model: settings.model.clone(),
        verify_concurrency: settings.verify_concurrency,
        models: Arc::new(OpenAiProvider::from_settings(&settings)),
        search: Arc::new(DuckDuckGoBackend::new(settings.search_timeout)?),
    };

    let listener = TcpListener::bind(&settings.addr).await?;
    tracing::info!(addr = %settings.addr, model = %settings.model, "truthline-api listening");
    axum::serve(listener, api::router(state)).await?;
    Ok(())
}
