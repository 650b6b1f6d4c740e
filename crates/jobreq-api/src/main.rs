//! JobReq API Server
//!
//! Configuration comes from `JOBREQ_CONFIG` (a TOML file) when set, with
//! `JOBREQ_*` environment variables taking precedence.

use std::sync::Arc;

use jobreq_api::{create_router, state::AppState};
use jobreq_core::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match std::env::var("JOBREQ_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "jobreq_api={0},jobreq_extractor={0},tower_http={0}",
            config.logging.level
        )
        .into()
    });
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state; the recognizer client is built on first use
    let state = Arc::new(AppState::from_config(config)?);
    tracing::info!(
        "Entity recognizer: {}",
        state.extractor.recognizer_name().unwrap_or("disabled")
    );

    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("JobReq API Server starting on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
