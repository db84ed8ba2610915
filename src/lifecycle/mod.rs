//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! SIGTERM/SIGINT (signals.rs) or an explicit trigger
//!     → Shutdown flips its watch flag
//!     → server stops accepting → in-flight requests drain → exit
//! ```
//!
//! # Design Decisions
//! - The flag is a `watch` channel, so a waiter that arrives after the
//!   trigger still returns immediately
//! - Background cache writes are not awaited on shutdown

pub mod signals;

pub use signals::wait_for_signal;

use tokio::sync::watch;

/// Shared stop flag for the proxy. Clones observe the same flag.
#[derive(Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Flip the flag. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the flag is set.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us
        let _ = rx.wait_for(|stopped| *stopped).await;
    }

    /// Trigger on Ctrl+C or SIGTERM from a background task.
    pub fn trigger_on_signal(&self) {
        let shutdown = self.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            shutdown.trigger();
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
