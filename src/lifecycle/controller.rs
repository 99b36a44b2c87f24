//! Lifecycle control around the server's start/stop pair.

use std::future::Future;

use crate::server::{Server, ServerError};

/// Drive `server` until its `start()` returns or `interrupt` resolves.
///
/// An interrupt is a normal termination request, not an error; it is
/// swallowed here and never propagated. However `start()` ends (normal
/// return, interrupt, or a fatal error), `stop()` runs exactly once before
/// this function returns. Errors other than the intercepted interrupt
/// propagate after `stop()` has completed.
pub async fn run_until_shutdown<S, F>(mut server: S, interrupt: F) -> Result<(), ServerError>
where
    S: Server,
    F: Future<Output = ()>,
{
    let outcome = {
        let start = server.start();
        tokio::pin!(start);
        tokio::select! {
            outcome = &mut start => outcome,
            () = interrupt => {
                tracing::info!("shutdown requested");
                Ok(())
            }
        }
    };

    // guaranteed release: every path out of start() goes through stop()
    let stopped = server.stop().await;

    match outcome {
        Err(err) => {
            if let Err(stop_err) = stopped {
                tracing::warn!(error = %stop_err, "stop failed while unwinding a server error");
            }
            Err(err)
        }
        Ok(()) => stopped,
    }
}
