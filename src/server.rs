//! Router assembly and server lifecycle

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Router,
};
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{Config, CorsConfig};
use crate::reference::ReferenceState;
use crate::routes;
use crate::state::AppState;

/// Build the application router around loaded state
pub fn app(state: AppState) -> Router {
    let body_limit = state.config().upload.max_content_length;
    let cors = cors_layer(&state.config().cors);

    Router::new()
        .merge(routes::index::router())
        .merge(routes::blueprint::router())
        .nest("/health", routes::health::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    match &config.allowed_origins {
        None => layer.allow_origin(Any),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(origins))
        }
    }
}

/// Create the upload directory and load the reference document
pub async fn prepare(config: &Config) -> anyhow::Result<ReferenceState> {
    tokio::fs::create_dir_all(&config.upload.dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.upload.dir.display()
            )
        })?;

    let reference = ReferenceState::load(&config.reference)
        .await
        .context("Failed to initialize application")?;

    tracing::info!(
        reference = %reference.reference_path().display(),
        upload_dir = %config.upload.dir.display(),
        "Startup validation complete"
    );

    Ok(reference)
}

/// Load the reference, then bind and serve until a shutdown signal arrives.
///
/// Returns before binding if the reference cannot be loaded.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let reference = prepare(&config).await?;

    let addr = config.server.socket_addr();
    let environment = config.server.environment;
    let app = app(AppState::new(config, reference));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(?environment, "Blueprint Reader listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
