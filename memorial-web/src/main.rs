//! memorial-web - Memorial gallery web service
//!
//! Loads the record set from static JSON files at startup and serves
//! the filterable, paginated gallery UI plus its JSON APIs.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use memorial_web::{build_router, config, store, AppState};

/// Memorial gallery web service
#[derive(Parser, Debug)]
#[command(name = "memorial-web", version)]
struct Args {
    /// Data directory holding manifest.json and the record files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Memorial Gallery (memorial-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = config::resolve(args.data_dir, args.port);
    info!("Data directory: {}", config.data_dir.display());

    let catalog = store::load_catalog(&config.data_dir).await?;
    if catalog.report.is_degraded() {
        warn!(
            "{} of {} data files failed to load; serving the rest",
            catalog.report.failed.len(),
            catalog.report.files_attempted
        );
    }
    info!(
        "✓ Loaded {} records from {} sources",
        catalog.report.records_loaded,
        catalog.manifest.sources.len()
    );

    let state = AppState::new(catalog.manifest, catalog.records, catalog.report);
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("memorial-web listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
