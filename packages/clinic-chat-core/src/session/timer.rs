//! Single-slot deferred task.
//!
//! Arming replaces whatever was armed before. Each arm gets a fresh token and
//! the fired callback must [`claim`](InactivityTimer::claim) it before acting:
//! a task that woke up just as it was being replaced finds its token stale and
//! does nothing.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct InactivityTimer {
    handle: Option<JoinHandle<()>>,
    token: u64,
}

impl InactivityTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `on_fire` after `after`, cancelling any previous schedule.
    ///
    /// Must be called from within a Tokio runtime. Returns the token handed to
    /// `on_fire`.
    pub fn arm<F, Fut>(&mut self, after: Duration, on_fire: F) -> u64
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let token = self.token;
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            on_fire(token).await;
        }));
        token
    }

    /// Cancel the pending schedule. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        // Invalidate the token even if the task already woke up.
        self.token = self.token.wrapping_add(1);
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Called by a fired task. Succeeds only for the current arm and leaves the
    /// timer disarmed; the claiming task keeps running to completion.
    pub fn claim(&mut self, token: u64) -> bool {
        if token != self.token || self.handle.is_none() {
            return false;
        }
        self.handle = None;
        self.token = self.token.wrapping_add(1);
        true
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for InactivityTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let fired = counter();
        let mut timer = InactivityTimer::new();

        let hits = fired.clone();
        timer.arm(Duration::from_secs(10), move |_| async move {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        assert!(timer.is_armed());

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_previous() {
        let fired = counter();
        let mut timer = InactivityTimer::new();

        let hits = fired.clone();
        timer.arm(Duration::from_secs(10), move |_| async move {
            hits.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(5)).await;
        let hits = fired.clone();
        timer.arm(Duration::from_secs(10), move |_| async move {
            hits.fetch_add(10, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let fired = counter();
        let mut timer = InactivityTimer::new();

        let hits = fired.clone();
        timer.arm(Duration::from_secs(1), move |_| async move {
            hits.fetch_add(1, Ordering::SeqCst);
        });

        assert!(timer.cancel());
        assert!(!timer.is_armed());
        assert!(!timer.cancel());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_claim_only_current_token() {
        let mut timer = InactivityTimer::new();

        let stale = timer.arm(Duration::from_secs(60), |_| async {});
        let current = timer.arm(Duration::from_secs(60), |_| async {});
        assert_ne!(stale, current);

        assert!(!timer.claim(stale));
        assert!(timer.is_armed());

        assert!(timer.claim(current));
        assert!(!timer.is_armed());
        assert!(!timer.claim(current));
    }

    #[tokio::test]
    async fn test_claim_after_cancel_fails() {
        let mut timer = InactivityTimer::new();
        let token = timer.arm(Duration::from_secs(60), |_| async {});

        timer.cancel();
        assert!(!timer.claim(token));
    }
}
