//! Shutdown coordination for the server component.

use std::future::Future;

use tokio::sync::watch;

/// Coordinator for graceful shutdown.
///
/// Wraps the sending half of a watch channel; every interested task grabs a
/// [`wait`](Shutdown::wait) future. Triggering is idempotent. Dropping the
/// coordinator releases waiters too, so a torn-down server never leaves a
/// task parked on it.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Request shutdown. Safe to call more than once.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// A future that resolves once shutdown has been requested, including
    /// requests made before this call.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.wait_for(|stop| *stop).await;
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn wait_is_pending_until_triggered() {
        let shutdown = Shutdown::new();
        let wait = shutdown.wait();
        assert!(tokio::time::timeout(Duration::from_millis(20), wait)
            .await
            .is_err());
        assert!(!shutdown.is_triggered());
    }

    #[tokio::test]
    async fn wait_resolves_after_trigger_even_when_subscribed_late() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.trigger();
        shutdown.wait().await;
        assert!(shutdown.is_triggered());
    }
}
