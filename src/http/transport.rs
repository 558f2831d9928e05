//! Wire transport behind the dispatcher.
//!
//! The dispatcher only needs "send this request, give me status and body".
//! [`Transport`] is that seam; [`ReqwestTransport`] is the real implementation
//! and tests substitute a scripted one.

use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{ApiError, Failure};

use super::request::{ApiRequest, RawResponse};

/// Provider-neutral async transport. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::Network`] when no response was received and
    /// [`Failure::Unknown`] for anything that is not a transport fault.
    /// HTTP error statuses are *not* errors at this layer.
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, Failure>;
}

/// HTTP transport with a cookie jar, so the server's HTTP-only session
/// cookie is replayed on every request without the client reading it.
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an `UNKNOWN_ERROR` if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::unknown(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http, base_url: config.api_url.clone() })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, Failure> {
        let mut builder = self.http.request(request.method.clone(), self.url(&request.path));
        builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder.header(reqwest::header::CONTENT_TYPE, "application/json"),
        };

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;
        Ok(RawResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> Failure {
    if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
        Failure::Network { reason: err.to_string() }
    } else {
        Failure::Unknown { reason: err.to_string() }
    }
}
