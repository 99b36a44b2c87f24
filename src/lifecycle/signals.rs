//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGINT, SIGTERM)
//! - Translate signal delivery into a shutdown request for the controller
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGINT and SIGTERM both mean graceful shutdown; neither is an error

use tokio::signal;

/// Resolves when the process is asked to shut down: ctrl-c (SIGINT), or
/// SIGTERM on Unix.
pub async fn shutdown_signal() {
    let interrupt = async {
        signal::ctrl_c()
            .await
            .expect("failed to install interrupt handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => tracing::info!("interrupt received"),
        _ = terminate => tracing::info!("termination signal received"),
    }
}
