//! Outbound request and raw response values.

use reqwest::Method;
use serde_json::Value;

/// Path segment that marks an authentication endpoint. Responses from these
/// never trigger a session refresh.
const AUTH_SEGMENT: &str = "/auth/";

/// One logical API call.
///
/// `attempt` counts how many times this logical request has been sent
/// already. The dispatcher permits exactly one automatic replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, query string included.
    pub path: String,
    pub body: Option<Value>,
    attempt: u8,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self { method, path: path.into(), body, attempt: 0 }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, None)
    }

    #[must_use]
    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self::new(Method::POST, path, body)
    }

    /// The path with any query string removed.
    #[must_use]
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or_default()
    }

    /// `true` for login/refresh/logout and anything else under `/auth/`.
    #[must_use]
    pub fn is_auth_endpoint(&self) -> bool {
        self.route().contains(AUTH_SEGMENT)
    }

    #[must_use]
    pub fn is_retry(&self) -> bool {
        self.attempt > 0
    }

    /// Whether a 401 on this request may trigger refresh-and-retry.
    #[must_use]
    pub fn may_refresh(&self) -> bool {
        !self.is_auth_endpoint() && !self.is_retry()
    }

    /// The same request, marked as replayed.
    #[must_use]
    pub fn into_retry(self) -> Self {
        Self { attempt: self.attempt.saturating_add(1), ..self }
    }
}

/// A response as it came off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
