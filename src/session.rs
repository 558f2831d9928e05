//! Local authentication state for the dashboard shell.
//!
//! DESIGN
//! ======
//! `SessionManager` mirrors what the UI needs to know about the session:
//! whether the user is signed in, whether an auth call is running, and the
//! last login error. It never holds tokens; "signed in" only means the last
//! login or refresh call succeeded.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::services::AuthService;
use crate::services::types::{LoginCredentials, Role};

/// Snapshot of the session as the UI sees it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub authenticated: bool,
    /// Role used at login; unknown after a session restored by refresh.
    pub role: Option<Role>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct SessionManager {
    auth: AuthService,
    state: Arc<RwLock<AuthState>>,
}

impl SessionManager {
    /// Starts in the loading state until [`check_session`](Self::check_session) runs.
    #[must_use]
    pub fn new(auth: AuthService) -> Self {
        let state = AuthState { loading: true, ..AuthState::default() };
        Self { auth, state: Arc::new(RwLock::new(state)) }
    }

    pub async fn snapshot(&self) -> AuthState {
        self.state.read().await.clone()
    }

    /// Restore an existing session from the refresh cookie, if any.
    /// Returns whether a session is active.
    pub async fn check_session(&self) -> bool {
        self.state.write().await.loading = true;
        let result = self.auth.refresh().await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(()) => {
                state.authenticated = true;
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "no valid session found");
                state.authenticated = false;
                state.role = None;
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns the login error after recording its message in the state.
    pub async fn login(&self, role: Role, credentials: &LoginCredentials) -> Result<(), ApiError> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }
        let result = self.auth.login(role, credentials).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(()) => {
                state.authenticated = true;
                state.role = Some(role);
                Ok(())
            }
            Err(e) => {
                state.error = Some(e.message.clone());
                Err(e)
            }
        }
    }

    /// Always ends signed out, whatever the server says.
    pub async fn logout(&self) {
        self.state.write().await.loading = true;
        self.auth.logout().await;
        *self.state.write().await = AuthState::default();
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
