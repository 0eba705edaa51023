//! One-shot signals.
//!
//! A signal starts unset and is set at most once. Observers either poll it
//! (`is_set`) or wait for it (`wait`). Clones share the same underlying state.

use std::sync::Arc;
use tokio::sync::watch;

/// A latch that transitions from unset to set exactly once.
#[derive(Debug, Clone)]
pub struct OneShot {
    tx: Arc<watch::Sender<bool>>,
}

impl OneShot {
    /// Create a new, unset signal.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Set the signal.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// signal was already set.
    pub fn fire(&self) -> bool {
        self.tx.send_if_modified(|set| {
            if *set {
                false
            } else {
                *set = true;
                true
            }
        })
    }

    /// Non-blocking check.
    pub fn is_set(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the signal is set. Returns immediately if it already is.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|set| *set).await;
    }
}

impl Default for OneShot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fires_once() {
        let signal = OneShot::new();
        assert!(!signal.is_set());
        assert!(signal.fire());
        assert!(signal.is_set());
        assert!(!signal.fire(), "second fire must not transition");
        assert!(signal.is_set());
    }

    #[test]
    fn test_clones_share_state() {
        let signal = OneShot::new();
        let observer = signal.clone();
        signal.fire();
        assert!(observer.is_set());
    }

    #[tokio::test]
    async fn test_wait_returns_when_already_set() {
        let signal = OneShot::new();
        signal.fire();
        tokio::time::timeout(Duration::from_millis(100), signal.wait())
            .await
            .expect("wait should not block on a set signal");
    }

    #[tokio::test]
    async fn test_wait_wakes_on_fire() {
        let signal = OneShot::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        signal.fire();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }
}
