//! Single-flight session refresh.
//!
//! DESIGN
//! ======
//! When several requests hit `401` at roughly the same time, only one of them
//! may call the refresh endpoint. With rotating refresh tokens a second
//! refresh would invalidate the first one's cookie under an in-flight retry.
//!
//! The first caller to arrive while idle becomes the leader and runs the
//! refresh future itself. Callers arriving while it runs register a
//! `oneshot` receiver and wait. When the leader finishes, the state flips
//! back to idle and every waiter receives the same outcome, in registration
//! order.
//!
//! The check-and-set happens under a `std::sync::Mutex` that is never held
//! across an `.await`. The leader's [`RefreshLease`] settles the state on drop,
//! so a leader that panics or is cancelled still releases its waiters and a
//! later `401` can start a fresh refresh.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;

use crate::error::ApiError;

type Outcome = Result<(), ApiError>;

enum RefreshState {
    Idle,
    Refreshing { waiters: Vec<oneshot::Sender<Outcome>> },
}

enum Role {
    Leader,
    Waiter(oneshot::Receiver<Outcome>),
}

/// Owned refresh state for one client instance.
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self { state: Mutex::new(RefreshState::Idle) }
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        matches!(*self.lock(), RefreshState::Refreshing { .. })
    }

    /// Number of callers currently parked behind the in-flight refresh.
    #[must_use]
    pub fn waiter_count(&self) -> usize {
        match &*self.lock() {
            RefreshState::Idle => 0,
            RefreshState::Refreshing { waiters } => waiters.len(),
        }
    }

    /// Run `refresh` unless one is already in flight, in which case wait for
    /// that one instead. Either way the result is the outcome of the single
    /// refresh that was outstanding.
    ///
    /// # Errors
    ///
    /// Returns the refresh's [`ApiError`], or an `UNKNOWN_ERROR` if the
    /// leading caller was dropped before the refresh resolved.
    pub async fn refresh_with<F, Fut>(&self, refresh: F) -> Result<(), ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Outcome>,
    {
        match self.join() {
            Role::Waiter(rx) => {
                tracing::debug!("session refresh in flight; waiting");
                rx.await
                    .unwrap_or_else(|_| Err(ApiError::unknown("session refresh ended without a result")))
            }
            Role::Leader => {
                let lease = RefreshLease { coordinator: self, settled: false };
                tracing::debug!("starting session refresh");
                let outcome = refresh().await;
                lease.settle(outcome.clone());
                outcome
            }
        }
    }

    fn join(&self) -> Role {
        let mut state = self.lock();
        if let RefreshState::Refreshing { waiters } = &mut *state {
            let (tx, rx) = oneshot::channel();
            waiters.push(tx);
            return Role::Waiter(rx);
        }
        *state = RefreshState::Refreshing { waiters: Vec::new() };
        Role::Leader
    }

    fn release(&self, outcome: &Outcome) {
        let previous = std::mem::replace(&mut *self.lock(), RefreshState::Idle);
        let RefreshState::Refreshing { waiters } = previous else {
            return;
        };

        match outcome {
            Ok(()) => tracing::info!(waiters = waiters.len(), "session refreshed"),
            Err(e) => tracing::warn!(waiters = waiters.len(), status = e.status, error = %e, "session refresh failed"),
        }
        for waiter in waiters {
            // A waiter whose caller was dropped has nothing left to notify.
            let _ = waiter.send(outcome.clone());
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Held by the leader while its refresh runs.
struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshLease<'_> {
    fn settle(mut self, outcome: Outcome) {
        self.settled = true;
        self.coordinator.release(&outcome);
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator
                .release(&Err(ApiError::unknown("session refresh was abandoned before completing")));
        }
    }
}

#[cfg(test)]
#[path = "refresh_test.rs"]
mod tests;
