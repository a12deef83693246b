//! Graceful shutdown controller for the Volt node.
//!
//! Listens for SIGINT/SIGTERM and flips a `tokio::sync::watch` flag that
//! every subsystem observes. A subscriber created after the trigger still
//! sees it.

use tokio::signal;
use tokio::sync::watch;

/// Coordinates graceful shutdown across all node subsystems.
#[derive(Clone, Debug)]
pub struct ShutdownController {
    tx: watch::Sender<bool>,
}

/// One subsystem's view of the shutdown flag.
#[derive(Clone, Debug)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger shutdown programmatically.
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait for SIGTERM or SIGINT, then trigger shutdown.
    pub async fn wait_for_signal(&self) {
        let ctrl_c = async {
            if let Err(error) = signal::ctrl_c().await {
                tracing::error!(%error, "failed to listen for SIGINT");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(error) => {
                    tracing::error!(%error, "failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => { tracing::info!("received SIGINT, shutting down"); }
            _ = terminate => { tracing::info!("received SIGTERM, shutting down"); }
            _ = self.subscribe().triggered() => {}
        }

        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolves once shutdown has been triggered, immediately if it already
    /// was. A dropped controller counts as a trigger.
    pub async fn triggered(mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn programmatic_shutdown_notifies_subscribers() {
        let controller = ShutdownController::new();
        let signal = controller.subscribe();
        controller.shutdown();
        tokio::time::timeout(Duration::from_secs(1), signal.triggered())
            .await
            .expect("signal should resolve");
    }

    #[tokio::test]
    async fn multiple_subscribers_all_notified() {
        let controller = ShutdownController::new();
        let a = controller.subscribe();
        let b = controller.subscribe();
        controller.shutdown();
        a.triggered().await;
        b.triggered().await;
    }

    #[tokio::test]
    async fn late_subscriber_sees_earlier_trigger() {
        let controller = ShutdownController::new();
        controller.shutdown();
        let late = controller.subscribe();
        assert!(late.is_triggered());
        late.triggered().await;
    }

    #[tokio::test(start_paused = true)]
    async fn untriggered_signal_stays_pending() {
        let controller = ShutdownController::new();
        let signal = controller.subscribe();
        let waited = tokio::time::timeout(Duration::from_secs(60), signal.triggered()).await;
        assert!(waited.is_err());
        assert!(!controller.is_shutdown());
    }
}
