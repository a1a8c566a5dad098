//! Cooperative cancellation
//!
//! A [`CancelToken`] is threaded through every suspension point of a listing
//! run. Clones share the same flag; cancelling any clone cancels them all.

use std::sync::Arc;
use tokio::sync::watch;

/// Shared cancellation flag backed by a `watch` channel
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Cancel the token and wake every waiter
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Check whether the token has been cancelled
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolve once the token is cancelled
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        while !*receiver.borrow_and_update() {
            // The sender lives as long as `self`, so this never errors.
            if receiver.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
