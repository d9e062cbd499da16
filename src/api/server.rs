//! Capture API server lifecycle — bind, serve, graceful shutdown.
//!
//! Pattern: bind → spawn background task → return handle with shutdown
//! channel.

use std::net::SocketAddr;

use tokio::sync::oneshot;

use crate::api::router::capture_router;
use crate::api::types::ApiContext;

/// Handle to a running capture API server.
pub struct CaptureServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl CaptureServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Capture server shutdown signal sent");
        }
    }
}

/// Bind the capture API server and spawn it in a background task.
pub async fn start_server(
    ctx: ApiContext,
    addr: SocketAddr,
) -> Result<CaptureServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind capture server: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = capture_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Capture server received shutdown signal");
        };

        tracing::info!(%addr, "Capture server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Capture server error: {e}");
        }

        tracing::info!("Capture server stopped");
    });

    Ok(CaptureServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}
