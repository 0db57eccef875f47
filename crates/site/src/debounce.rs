//! Trailing-edge debouncing for repeatable actions.
//!
//! A [`Debouncer`] wraps an action and collapses bursts of calls into a
//! single invocation: every call restarts the wait timer, and when the
//! timer finally expires the action runs once with the value from the most
//! recent call. Calls at t=0, t=100 and t=150 with a 200ms wait produce
//! exactly one invocation at t=350, with the t=150 value.
//!
//! The site uses this to coalesce cache refresh requests; deploy hooks can
//! hammer the refresh endpoint without Supabase seeing a fetch per hit.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Debounced wrapper around an action.
///
/// Cloning is cheap and clones share the same timer: a call through one
/// clone reschedules a call made through another.
pub struct Debouncer<T> {
    inner: Arc<DebouncerInner<T>>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct DebouncerInner<T> {
    wait: Duration,
    action: Box<dyn Fn(T) + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T> Drop for DebouncerInner<T> {
    fn drop(&mut self) {
        if let Some(handle) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

impl<T: Send + 'static> Debouncer<T> {
    /// Wrap `action` so it runs `wait` after the last call.
    ///
    /// Must be created and called within a tokio runtime; the timer is a
    /// spawned task.
    pub fn new(wait: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(DebouncerInner {
                wait,
                action: Box::new(action),
                pending: Mutex::new(None),
            }),
        }
    }

    /// Schedule the action with `value`.
    ///
    /// A previously scheduled call that has not fired yet is cancelled, so
    /// only the most recent value ever reaches the action. A call that
    /// arrives after the action fired starts a fresh cycle.
    pub fn call(&self, value: T) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.wait).await;
            (inner.action)(value);
        });

        let mut pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Cancel the scheduled call, if any. The action does not run.
    pub fn cancel(&self) {
        let mut pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }

    /// Whether a call is scheduled and has not fired yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
