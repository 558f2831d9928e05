//! HTTP core: request dispatch with coordinated session refresh.
//!
//! DESIGN
//! ======
//! - `request`: the `ApiRequest` value and raw responses.
//! - `transport`: the `Transport` seam and the cookie-jar `reqwest` impl.
//! - `refresh`: single-flight refresh shared by every caller of a client.
//! - `dispatcher`: send/refresh/retry and the typed `get/post/...` surface.

pub mod dispatcher;
pub mod refresh;
pub mod request;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use dispatcher::Dispatcher;
pub use refresh::RefreshCoordinator;
pub use request::{ApiRequest, RawResponse};
pub use transport::{ReqwestTransport, Transport};
