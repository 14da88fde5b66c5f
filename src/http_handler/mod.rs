pub use reqwest;
pub use url;

pub mod common;
pub mod http_client;
pub mod observer;
pub mod query;
pub mod request_common;
