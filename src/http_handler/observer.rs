use super::common::RequestError;
use crate::{error, info, wire};
use url::Url;

/// One step of a request/response exchange, reported in protocol order:
/// `Opening`, then `SendingBody` (POST only), then `Reading`, then exactly
/// one of `Read` or `Failed`.
#[derive(Debug)]
pub enum RequestEvent<'a> {
    /// A connection to `url` is being opened.
    Opening { url: &'a Url },
    /// The encoded request body is about to be written.
    SendingBody { url: &'a Url, body: &'a str },
    /// The response is about to be read.
    Reading { url: &'a Url },
    /// A body was read; `status` may well be non-2xx.
    Read { url: &'a Url, status: u16, body: &'a str },
    /// The exchange produced no readable body; the error propagates to the
    /// caller after this event.
    Failed { url: &'a Url, error: &'a RequestError },
}

/// Diagnostics seam of the request path.
///
/// The executor reports every protocol step here instead of logging itself,
/// so callers decide whether and how to log. Observers never influence the
/// outcome of a call.
pub trait RequestObserver: Send + Sync {
    fn on_event(&self, event: &RequestEvent<'_>);
}

/// Default observer, drops every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {
    fn on_event(&self, _event: &RequestEvent<'_>) {}
}

/// Observer routing events through the crate's stdout logger. Bodies only
/// show up when `AUTHLINK_LOG_HTTP` is set.
#[derive(Debug, Default)]
pub struct LogObserver;

impl RequestObserver for LogObserver {
    fn on_event(&self, event: &RequestEvent<'_>) {
        match event {
            RequestEvent::Opening { url } => info!("Opening connection to {url}"),
            RequestEvent::SendingBody { url, body } => wire!("Writing POST data to {url}: {body}"),
            RequestEvent::Reading { url } => info!("Reading data from {url}"),
            RequestEvent::Read { url: _, status, body } => {
                info!("Successful read, server response was {status}");
                wire!("Response: {body}");
            }
            RequestEvent::Failed { url, error } => error!("Request to {url} failed: {error}"),
        }
    }
}
