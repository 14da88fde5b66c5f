//! An asynchronous HTTP request layer for authentication and profile service
//! endpoints.
//!
//! The crate normalizes every GET/POST exchange into a single outcome: any
//! readable response body (including server-sent error pages) is returned as
//! data together with the status code, while failures without a body
//! propagate as errors. Concrete services compose a [`RequestExecutor`]
//! instead of inheriting request plumbing.
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]

pub mod environment;
pub mod http_handler;
mod logger;

pub use environment::EnvironmentConfig;
pub use http_handler::common::{HTTPError, RequestError, TransportError, URLError};
pub use http_handler::http_client::{Connection, HTTPClient, ProxyConfig};
pub use http_handler::observer::{LogObserver, NoopObserver, RequestEvent, RequestObserver};
pub use http_handler::query::{QueryParameters, build_query, concatenate_url, constant_url};
pub use http_handler::request_common::{RequestExecutor, RequestOutcome};
pub use url::Url;
