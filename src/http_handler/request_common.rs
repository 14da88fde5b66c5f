use super::common::RequestError;
use super::http_client::{Connection, HTTPClient, ProxyConfig};
use super::observer::{NoopObserver, RequestEvent, RequestObserver};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use std::sync::Arc;
use url::Url;

/// Outcome of one GET/POST call.
///
/// Carries the UTF-8 response body together with the status code the server
/// answered with. A non-2xx status with a readable body is a valid outcome;
/// servers send structured error payloads that callers want as data, not as
/// an opaque error.
#[derive(Debug)]
pub struct RequestOutcome {
    body: String,
    status: u16,
}

impl RequestOutcome {
    /// The response body, decoded as UTF-8.
    pub fn body(&self) -> &str { &self.body }
    /// The numeric HTTP status code.
    pub fn status(&self) -> u16 { self.status }
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
    /// Consumes the outcome, keeping only the body.
    pub fn into_body(self) -> String { self.body }
}

/// Issues GET/POST requests and normalizes the server's answer into a
/// single [`RequestOutcome`].
///
/// A concrete service holds one of these; every call opens its own
/// single-use connection through the configured proxy, so an executor can be
/// shared freely across tasks. Diagnostics go through the injected
/// [`RequestObserver`].
pub struct RequestExecutor {
    client: HTTPClient,
    observer: Arc<dyn RequestObserver>,
}

impl RequestExecutor {
    /// Creates an executor routing through `proxy`, without diagnostics.
    pub fn new(proxy: ProxyConfig) -> Self {
        Self::with_observer(proxy, Arc::new(NoopObserver))
    }

    /// Creates an executor that reports every protocol step to `observer`.
    pub fn with_observer(proxy: ProxyConfig, observer: Arc<dyn RequestObserver>) -> Self {
        Self { client: HTTPClient::new(proxy), observer }
    }

    /// Returns the proxy route used for every request.
    pub fn proxy(&self) -> &ProxyConfig { self.client.proxy() }

    /// Performs a POST request to the specified URL and returns the result.
    ///
    /// `body` is encoded as UTF-8 and submitted as `content_type` with a
    /// `charset=utf-8` marker and an explicit `Content-Length`. If the
    /// server returns an error status but still provides a body, the body is
    /// returned as a normal outcome.
    ///
    /// # Errors
    /// Fails with a [`RequestError`] if the connection cannot be
    /// established or no response body was readable at all.
    pub async fn post(
        &self,
        url: &Url,
        body: &str,
        content_type: &str,
    ) -> Result<RequestOutcome, RequestError> {
        let connection = self.open(url)?;
        let encoded = body.as_bytes().to_vec();
        self.observer.on_event(&RequestEvent::SendingBody { url, body });
        let request = connection
            .request(Method::POST)
            .header(CONTENT_TYPE, format!("{content_type}; charset=utf-8"))
            .header(CONTENT_LENGTH, encoded.len())
            .body(encoded);
        self.read_outcome(url, request).await
    }

    /// Performs a GET request to the specified URL and returns the result.
    ///
    /// Convenience form of [`Self::get_with_authorization`] without an
    /// `Authorization` header.
    pub async fn get(&self, url: &Url) -> Result<RequestOutcome, RequestError> {
        self.get_with_authorization(url, None).await
    }

    /// Performs a GET request, attaching `Authorization: {authorization}`
    /// when a value is provided.
    ///
    /// # Errors
    /// Fails with a [`RequestError`] if the connection cannot be
    /// established or no response body was readable at all.
    pub async fn get_with_authorization(
        &self,
        url: &Url,
        authorization: Option<&str>,
    ) -> Result<RequestOutcome, RequestError> {
        let connection = self.open(url)?;
        let mut request = connection.request(Method::GET);
        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }
        self.read_outcome(url, request).await
    }

    fn open(&self, url: &Url) -> Result<Connection, RequestError> {
        self.observer.on_event(&RequestEvent::Opening { url });
        Ok(self.client.open(url)?)
    }

    /// Sends the request and applies the normalization protocol: any
    /// readable body is a valid outcome regardless of status, a failure
    /// without one propagates.
    async fn read_outcome(
        &self,
        url: &Url,
        request: reqwest::RequestBuilder,
    ) -> Result<RequestOutcome, RequestError> {
        self.observer.on_event(&RequestEvent::Reading { url });
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(url, e)),
        };
        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => {
                self.observer.on_event(&RequestEvent::Read { url, status, body: &body });
                Ok(RequestOutcome { body, status })
            }
            Err(e) => Err(self.fail(url, e)),
        }
    }

    fn fail(&self, url: &Url, error: reqwest::Error) -> RequestError {
        let converted = RequestError::from(error);
        self.observer.on_event(&RequestEvent::Failed { url, error: &converted });
        converted
    }
}

#[cfg(test)]
mod tests {
    use super::{RequestExecutor, RequestOutcome};
    use crate::http_handler::http_client::ProxyConfig;

    #[test]
    fn outcome_exposes_body_and_status() {
        let outcome = RequestOutcome { body: "error detail".to_string(), status: 500 };
        assert_eq!(outcome.body(), "error detail");
        assert_eq!(outcome.status(), 500);
        assert!(!outcome.is_success());
        assert_eq!(outcome.into_body(), "error detail");
    }

    #[test]
    fn executor_keeps_its_proxy_for_its_whole_lifetime() {
        let executor = RequestExecutor::new(ProxyConfig::server("http://127.0.0.1:8080"));
        assert!(matches!(executor.proxy(), ProxyConfig::Server { .. }));
    }
}
