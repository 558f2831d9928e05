//! Session endpoints: login, refresh, logout.
//!
//! The session token never passes through this code. Login and refresh only
//! cause the server to (re)set the HTTP-only cookie in the transport's jar.

use crate::error::ApiError;
use crate::http::{ApiRequest, Dispatcher};

use super::types::{LoginCredentials, Role};

const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";

#[derive(Clone)]
pub struct AuthService {
    dispatcher: Dispatcher,
}

impl AuthService {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// `POST /auth/login/<role>` with `{email, password}`.
    ///
    /// # Errors
    ///
    /// Returns the server's normalized error for bad credentials.
    pub async fn login(&self, role: Role, credentials: &LoginCredentials) -> Result<(), ApiError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| ApiError::unknown(format!("login payload could not be encoded: {e}")))?;
        let path = format!("{LOGIN_PATH}/{}", role.as_str());
        self.dispatcher.send(ApiRequest::post(path, Some(body))).await?;
        tracing::info!(role = role.as_str(), email = %credentials.email, "logged in");
        Ok(())
    }

    /// Renew the session cookie. Joins any refresh already in flight on the
    /// shared dispatcher instead of issuing a second one.
    ///
    /// # Errors
    ///
    /// Returns the refresh call's normalized error; a `401` means the caller
    /// must log in again.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.dispatcher.refresh_session().await
    }

    /// Best-effort logout. Failures are logged, never returned, because local
    /// session state is cleared regardless of the server's answer.
    pub async fn logout(&self) {
        if let Err(e) = self.dispatcher.send(ApiRequest::post(LOGOUT_PATH, None)).await {
            tracing::warn!(error = %e, status = e.status, "logout request failed; clearing local session anyway");
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
