//! Blueprint Reader Server
//!
//! Accepts PDF uploads and returns blueprint data when the upload is
//! byte-identical to the configured reference document.

use blueprint_verifier::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Initialize tracing
    let default_filter = if config.server.environment.is_development() {
        "blueprint_verifier=debug,tower_http=debug"
    } else {
        "blueprint_verifier=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Blueprint Reader v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Reference file: {}", config.reference.pdf_path.display());
    tracing::info!("Blueprint data: {}", config.reference.data_path.display());
    tracing::info!("Upload folder: {}", config.upload.dir.display());

    if let Err(e) = blueprint_verifier::run(config).await {
        tracing::error!("{:#}", e);
        return Err(e);
    }

    Ok(())
}
