//! # Cooperative Cancellation
//!
//! Long-running actors are stopped by asking, not by interrupting. The owner keeps a
//! [`CancelHandle`]; the actor keeps the matching [`CancelToken`] and looks at it only at
//! points where stopping is safe.
//!
//! Cleanup that must happen however the actor ends goes into a [`Finalizer`], which runs
//! its closure exactly once when dropped. That covers a normal exit, an early `?`
//! return, and the task being aborted while parked on an `.await`.

use tokio::sync::watch;

/// Creates a connected handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Owner side: requests cancellation.
///
/// Dropping the handle counts as a cancellation request.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Requests cancellation. Returns `true` only for the first request.
    pub fn cancel(&self) -> bool {
        self.tx.send_if_modified(|cancelled| {
            if *cancelled {
                false
            } else {
                *cancelled = true;
                true
            }
        })
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Actor side: observes cancellation at safe points.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once cancellation has been requested or the handle is gone.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // An Err means the handle was dropped, which is treated as a request.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Runs a closure exactly once when dropped.
pub struct Finalizer<F: FnOnce()> {
    cleanup: Option<F>,
}

impl<F: FnOnce()> Finalizer<F> {
    pub fn new(cleanup: F) -> Self {
        Self {
            cleanup: Some(cleanup),
        }
    }
}

impl<F: FnOnce()> Drop for Finalizer<F> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}
