//! Client core for the influencer-marketing admin dashboard.
//!
//! DESIGN
//! ======
//! All API traffic goes through one [`http::Dispatcher`] per client. Sessions
//! are cookie-based: the transport's cookie jar carries the HTTP-only session
//! and the client only reacts to `401`s. When several in-flight requests see
//! an expired session, exactly one refresh call is made and each request is
//! replayed once after it succeeds.
//!
//! Every failure reaching a caller is an [`error::ApiError`]
//! (`{ message, status, code }`); raw transport errors never escape.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod services;
pub mod session;

pub use client::AdminClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::Dispatcher;
