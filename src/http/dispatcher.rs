//! Request dispatcher: one logical API call in, a decoded body or a
//! normalized [`ApiError`] out.
//!
//! DESIGN
//! ======
//! The dispatcher owns the transport and a [`RefreshCoordinator`]. A `401`
//! on an ordinary request hands off to the coordinator and, once the shared
//! refresh succeeds, replays the request exactly once. Auth endpoints, the
//! configured refresh endpoint and replays never trigger a refresh, which
//! rules out refresh loops.
//!
//! `Dispatcher` is cheap to clone; clones share the transport and the
//! refresh state, so every service built from the same dispatcher is
//! coordinated by the same single-flight refresh.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ApiError, Failure};

use super::refresh::RefreshCoordinator;
use super::request::{ApiRequest, RawResponse};
use super::transport::{ReqwestTransport, Transport};

#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    transport: Box<dyn Transport>,
    refresh: RefreshCoordinator,
    refresh_path: String,
}

impl Dispatcher {
    /// Dispatcher over a custom transport.
    #[must_use]
    pub fn new(transport: impl Transport + 'static, refresh_path: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                transport: Box::new(transport),
                refresh: RefreshCoordinator::new(),
                refresh_path: refresh_path.into(),
            }),
        }
    }

    /// Dispatcher over HTTP with a cookie jar, configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns an `UNKNOWN_ERROR` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(transport, config.refresh_path.clone()))
    }

    #[must_use]
    pub fn refresh_coordinator(&self) -> &RefreshCoordinator {
        &self.inner.refresh
    }

    /// Send one logical request.
    ///
    /// # Errors
    ///
    /// Every failure is returned as a normalized [`ApiError`]; see the module
    /// docs for the refresh-and-retry rules.
    pub async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let response = self.execute(&request).await?;
        if response.status != 401 || !self.may_refresh(&request) {
            return decode(response);
        }

        tracing::debug!(method = %request.method, path = %request.path, "unauthorized; coordinating session refresh");
        self.refresh_session().await?;

        let retry = request.into_retry();
        tracing::debug!(method = %retry.method, path = %retry.path, "replaying request after refresh");
        let response = self.execute(&retry).await?;
        decode(response)
    }

    /// Auth endpoints, replays and the configured refresh endpoint (which
    /// need not live under `/auth/`) never start a refresh.
    fn may_refresh(&self, request: &ApiRequest) -> bool {
        request.may_refresh() && request.route() != self.inner.refresh_path
    }

    /// Refresh the session through the coordinator, joining any refresh
    /// already in flight.
    ///
    /// # Errors
    ///
    /// Returns the refresh call's normalized error.
    pub async fn refresh_session(&self) -> Result<(), ApiError> {
        self.inner
            .refresh
            .refresh_with(|| self.call_refresh_endpoint())
            .await
    }

    async fn call_refresh_endpoint(&self) -> Result<(), ApiError> {
        let request = ApiRequest::post(self.inner.refresh_path.clone(), None);
        let response = self.execute(&request).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(ApiError::from_response(response.status, &response.body))
        }
    }

    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        match self.inner.transport.execute(request).await {
            Ok(response) => {
                tracing::debug!(method = %request.method, path = %request.path, status = response.status, "api response");
                Ok(response)
            }
            Err(failure) => {
                tracing::warn!(method = %request.method, path = %request.path, failure = ?failure, "api request failed");
                Err(failure.into())
            }
        }
    }

    // =========================================================================
    // TYPED SURFACE
    // =========================================================================

    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] on any failure.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_typed(Method::GET, path, None).await
    }

    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] on any failure.
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Option<&impl Serialize>) -> Result<T, ApiError> {
        let body = body.map(to_body).transpose()?;
        self.send_typed(Method::POST, path, body).await
    }

    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] on any failure.
    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T, ApiError> {
        let body = to_body(body)?;
        self.send_typed(Method::PUT, path, Some(body)).await
    }

    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] on any failure.
    pub async fn patch<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T, ApiError> {
        let body = to_body(body)?;
        self.send_typed(Method::PATCH, path, Some(body)).await
    }

    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] on any failure.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_typed(Method::DELETE, path, None).await
    }

    async fn send_typed<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, ApiError> {
        let value = self.send(ApiRequest::new(method, path, body)).await?;
        serde_json::from_value(value).map_err(|e| ApiError::unknown(format!("unexpected response body for {path}: {e}")))
    }
}

/// Turn a raw response into the caller's result. Empty success bodies
/// decode to `null` so `delete`-style calls can target `()`.
fn decode(response: RawResponse) -> Result<Value, ApiError> {
    if !response.is_success() {
        return Err(Failure::Http { status: response.status, body: response.body }.into());
    }
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body)
        .map_err(|e| Failure::Unknown { reason: format!("response body is not valid JSON: {e}") }.into())
}

fn to_body(body: &impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::unknown(format!("request body could not be encoded: {e}")))
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;
