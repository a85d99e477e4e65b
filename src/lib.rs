//! `json-rest-client` is a small blocking client for JSON REST endpoints.
//!
//! A [`RestClient`] is bound to one scheme/host/port and issues requests
//! against relative paths:
//! - [`RestClient::get`] and [`RestClient::delete`] encode params as a query string
//! - [`RestClient::post`] and [`RestClient::put`] place params in the body
//!
//! Transport failures in the retryable set are retried up to the configured
//! number of tries. Non-2xx statuses are data, not errors: they are logged and
//! returned like any other response.

mod client;
mod decode;
mod endpoint;
mod error;
mod headers;
mod log;
mod options;
mod params;
mod transport;
mod types;
mod wire;

pub use client::RestClient;
pub use endpoint::{Endpoint, Scheme};
pub use error::{Disposition, RestClientError, TransportError, TransportErrorKind};
pub use headers::Headers;
pub use log::{Logger, TracingLogger};
pub use options::{BodyEncoding, ClientOptions};
pub use params::Params;
pub use transport::{ReqwestTransport, Transport};
pub use types::{JsonResult, Outcome};
pub use wire::{Method, PreparedRequest, RawResponse};

/// Log level passed to [`Logger::log`].
pub use tracing::Level;

pub type Result<T> = std::result::Result<T, RestClientError>;
