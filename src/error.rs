//! Normalized API errors.
//!
//! DESIGN
//! ======
//! Every failure the client can hit is first captured as a [`Failure`]
//! variant at the boundary where it happens (transport, HTTP status, body
//! decode). Normalization into [`ApiError`] is a total `From` conversion, so
//! callers only ever see one shape: `{ message, status, code }`.

use serde::{Deserialize, Serialize};

pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

const NETWORK_MESSAGE: &str = "Network error. Please check your connection.";
const HTTP_FALLBACK_MESSAGE: &str = "An error occurred";
const UNKNOWN_FALLBACK_MESSAGE: &str = "An unexpected error occurred";

// =============================================================================
// FAILURE
// =============================================================================

/// A failure observed at one of the client's boundaries, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The request never produced a response (connect, DNS, timeout, reset).
    Network { reason: String },
    /// The server answered with a non-success status.
    Http { status: u16, body: String },
    /// Anything else: undecodable bodies, abandoned refreshes, client bugs.
    Unknown { reason: String },
}

// =============================================================================
// API ERROR
// =============================================================================

/// The single error shape handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} (status {status})")]
pub struct ApiError {
    pub message: String,
    /// HTTP status, or `0` when no response was received.
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    #[must_use]
    pub fn network() -> Self {
        Self { message: NETWORK_MESSAGE.to_owned(), status: 0, code: Some(NETWORK_ERROR.to_owned()) }
    }

    #[must_use]
    pub fn unknown(reason: impl Into<String>) -> Self {
        Failure::Unknown { reason: reason.into() }.into()
    }

    /// Build an error carrying an explicit status and code, for failures
    /// detected locally before any request is sent.
    #[must_use]
    pub fn local(status: u16, code: &str, message: impl Into<String>) -> Self {
        Self { message: message.into(), status, code: Some(code.to_owned()) }
    }

    /// Normalize a non-success HTTP response.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        Failure::Http { status, body: body.to_owned() }.into()
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        self.code.as_deref() == Some(NETWORK_ERROR)
    }
}

/// Error body fields the server may send. Both are optional.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl From<Failure> for ApiError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Network { .. } => Self::network(),
            Failure::Http { status, body } => {
                let parsed = serde_json::from_str::<ErrorBody>(&body).ok();
                let (message, code) = match parsed {
                    Some(b) => (b.message.filter(|m| !m.is_empty()), b.code),
                    None => (None, None),
                };
                Self { message: message.unwrap_or_else(|| HTTP_FALLBACK_MESSAGE.to_owned()), status, code }
            }
            Failure::Unknown { reason } => {
                let message = if reason.trim().is_empty() { UNKNOWN_FALLBACK_MESSAGE.to_owned() } else { reason };
                Self { message, status: 0, code: Some(UNKNOWN_ERROR.to_owned()) }
            }
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
