//! HTTP surface: the `/reset` endpoint and the server lifecycle

pub mod response;

use crate::execution::ResetService;
use anyhow::{Context, Result};
use axum::{extract::State, routing::any, Router};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use response::{ResetResponse, RESET_COMPLETE};

/// Build the router. `/reset` accepts any method.
pub fn router(service: ResetService) -> Router {
    Router::new()
        .route("/reset", any(reset))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn reset(State(service): State<ResetService>) -> ResetResponse {
    service.reset().await.into()
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
///
/// Draining is bounded by `shutdown_timeout`; running past it is an error, as
/// is the server stopping on its own.
pub async fn serve<F>(
    listener: TcpListener,
    service: ResetService,
    shutdown_timeout: Duration,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let addr = listener.local_addr().context("Failed to read listen address")?;
    info!("Starting server at {}", addr);

    let (drain_tx, drain_rx) = oneshot::channel::<()>();
    let app = router(service);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result.context("Server task panicked")?.context("Server failed")?;
            anyhow::bail!("Server stopped unexpectedly");
        }
        _ = shutdown => {}
    }

    info!(
        "Stopping the server. Waiting for up to {}s",
        shutdown_timeout.as_secs()
    );
    let _ = drain_tx.send(());

    tokio::time::timeout(shutdown_timeout, server)
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "Failed to shut down: requests still running after {}s",
                shutdown_timeout.as_secs()
            )
        })?
        .context("Server task panicked")?
        .context("Failed to shut down server")?;

    info!("Server stopped");
    Ok(())
}
