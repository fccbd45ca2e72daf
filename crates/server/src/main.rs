// crates/server/src/main.rs
//! Subgen server binary.
//!
//! Wires the OpenAI transcription backend into the job pipeline, builds the
//! Axum app, and serves it. Configuration comes from the environment; the
//! job registry is in-memory, so jobs in flight at shutdown are lost.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use subgen_core::{JobPipeline, JobRegistry, OpenAiBackend, StoragePaths};
use subgen_server::{create_app_with_static, AppState, Config};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("subgen=info,tower_http=warn")),
        )
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env();
    let api_key = config
        .api_key
        .clone()
        .context("OPENAI_API_KEY is not set")?;

    let storage = StoragePaths::new(&config.upload_dir, &config.output_dir)?;
    let backend = Arc::new(OpenAiBackend::new(api_key));
    let pipeline = JobPipeline::new(Arc::new(JobRegistry::new()), backend, storage)
        .with_backend_timeout(config.backend_timeout);

    let state = AppState::new(pipeline);
    let app = create_app_with_static(state, config.static_dir.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    eprintln!(
        "\nsubgen v{} \u{2014} http://localhost:{}\n",
        env!("CARGO_PKG_VERSION"),
        config.port
    );
    tracing::info!(
        port = config.port,
        uploads = %config.upload_dir.display(),
        outputs = %config.output_dir.display(),
        "subgen listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
