// ABOUTME: Cooperative stop flag shared between the signal handler and polling loops.
// ABOUTME: Loops check it between ticks; in-flight collaborator calls always finish.

use std::sync::Arc;
use tokio::sync::watch;

/// A cloneable "stop requested" flag.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Ask running loops to stop at their next checkpoint.
    pub fn request(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_requested(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once a stop has been requested.
    pub async fn requested(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only errors if it was dropped.
        let _ = rx.wait_for(|stop| *stop).await;
    }

    /// Sleep for `duration`, waking early if a stop is requested.
    ///
    /// Returns `true` if the sleep was cut short.
    pub async fn sleep(&self, duration: std::time::Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => self.is_requested(),
            _ = self.requested() => true,
        }
    }

    /// Request a stop when the process receives Ctrl-C.
    pub fn install_ctrl_c_handler(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("stop requested; finishing the current step");
                signal.request();
            }
        });
    }
}
