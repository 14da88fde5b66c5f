use strum_macros::Display;

/// Failure to establish a proxied connection to a URL.
#[derive(Debug, Display)]
pub enum TransportError {
    /// The proxy descriptor could not be turned into a usable route.
    Proxy(String),
    /// The HTTP stack behind the connection could not be assembled.
    Setup(String),
}

impl std::error::Error for TransportError {}

/// Failure of a GET/POST call that yielded no readable body at all.
///
/// A non-2xx response with a body is *not* one of these, it is returned as a
/// regular outcome.
#[derive(Debug, Display)]
pub enum RequestError {
    Transport(TransportError),
    NoConnection,
    Timeout,
    /// A response arrived but its body could not be read to the end.
    BodyUnreadable,
    /// The server closed the connection mid-exchange.
    Interrupted,
    Unknown,
}

impl std::error::Error for RequestError {}

impl From<TransportError> for RequestError {
    fn from(value: TransportError) -> Self { RequestError::Transport(value) }
}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            RequestError::Timeout
        } else if value.is_connect() {
            RequestError::NoConnection
        } else if value.is_body() || value.is_decode() {
            RequestError::BodyUnreadable
        } else if value.is_request() {
            RequestError::Interrupted
        } else {
            RequestError::Unknown
        }
    }
}

/// Rejected URL construction, the argument error of `concatenate_url`.
#[derive(Debug, Display)]
pub enum URLError {
    Malformed(url::ParseError),
}

impl std::error::Error for URLError {}

#[derive(Debug, Display)]
pub enum HTTPError {
    HTTPRequestError(RequestError),
    HTTPURLError(URLError),
}

impl std::error::Error for HTTPError {}

impl From<RequestError> for HTTPError {
    fn from(value: RequestError) -> Self { HTTPError::HTTPRequestError(value) }
}

impl From<URLError> for HTTPError {
    fn from(value: URLError) -> Self { HTTPError::HTTPURLError(value) }
}
