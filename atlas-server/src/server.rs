//! Axum server setup
//!
//! Router with gzip compression, request tracing and a request body
//! limit. Runs until Ctrl+C or SIGTERM, then closes the pool.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerSettings;
use crate::error::ServerError;
use crate::routes;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the application router with all middleware attached.
///
/// Handlers share the pool itself as router state.
pub fn build_router(pool: PgPool) -> Router {
    Router::new()
        .merge(routes::health::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(pool)
}

/// Run the HTTP server.
///
/// ```ignore
/// let pool = atlas_db::create_pool(&database_url).await?;
/// run_server(pool, &settings.server).await?;
/// ```
pub async fn run_server(pool: PgPool, settings: &ServerSettings) -> Result<(), ServerError> {
    let app = build_router(pool.clone());

    let addr = settings.bind_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, production = settings.production, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
///
/// A handler that cannot be installed never fires; the other one still can.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
