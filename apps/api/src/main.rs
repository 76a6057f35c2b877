mod config;
mod errors;
mod merge;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, RunMode};
use crate::merge::loader::run_batch;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume merge v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(&config);
    info!(
        "Merge thresholds: dedupe {} / summary {}",
        state.merge_config.dedupe_threshold, state.merge_config.summary_threshold
    );

    match config.run_mode {
        RunMode::Batch => {
            info!(
                "Batch mode: {} -> {}",
                config.input_dir.display(),
                config.output_dir.display()
            );
            let merge_config = state.merge_config.clone();
            tokio::task::spawn_blocking(move || {
                run_batch(
                    &config.input_dir,
                    &config.output_dir,
                    config.exclude_patterns.as_slice(),
                    &merge_config,
                )
            })
            .await??;
            Ok(())
        }
        RunMode::Serve => serve(&config, state).await,
    }
}

async fn serve(config: &Config, state: AppState) -> Result<()> {
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
