use super::common::TransportError;
use std::time::Duration;
use url::Url;

/// Connect and read timeout applied to every opened connection.
const TIMEOUT: Duration = Duration::from_millis(15_000);

/// Proxy route used for every request issued by a service instance.
///
/// "No proxy" is an explicit configuration of its own, never an absent
/// value, so a service always states how its traffic is routed.
#[derive(Debug, Clone, Default)]
pub enum ProxyConfig {
    /// Connect directly, ignoring any proxy environment variables.
    #[default]
    Direct,
    /// Route through the given proxy URL (`http`, `https` or `socks5`).
    Server {
        url: String,
        username: Option<String>,
        password: Option<String>,
    },
}

impl ProxyConfig {
    /// Creates a proxy route from a URL, without authentication.
    pub fn server(url: impl Into<String>) -> Self {
        Self::Server { url: url.into(), username: None, password: None }
    }

    /// Attaches basic-auth credentials to a proxy route. No-op on `Direct`.
    #[must_use]
    pub fn with_auth(self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        match self {
            Self::Direct => Self::Direct,
            Self::Server { url, .. } => Self::Server {
                url,
                username: Some(user.into()),
                password: Some(pass.into()),
            },
        }
    }

    fn apply(&self, builder: reqwest::ClientBuilder) -> Result<reqwest::ClientBuilder, TransportError> {
        match self {
            Self::Direct => Ok(builder.no_proxy()),
            Self::Server { url, username, password } => {
                let mut proxy = reqwest::Proxy::all(url.as_str())
                    .map_err(|e| TransportError::Proxy(e.to_string()))?;
                if let (Some(user), Some(pass)) = (username, password) {
                    proxy = proxy.basic_auth(user, pass);
                }
                Ok(builder.proxy(proxy))
            }
        }
    }
}

/// A simple wrapper around `reqwest` used to open proxied connections
/// with a preconfigured timeout policy.
///
/// Every call opens its own single-use [`Connection`]; nothing is pooled or
/// cached across calls. It holds the [`ProxyConfig`] for its whole lifetime.
#[derive(Debug)]
pub struct HTTPClient {
    /// The proxy route applied to every opened connection.
    proxy: ProxyConfig,
}

impl HTTPClient {
    /// Constructs a new `HTTPClient` routing through the given proxy.
    ///
    /// # Arguments
    /// * `proxy` – The proxy route for all connections opened by this client.
    ///
    /// # Returns
    /// A configured `HTTPClient` instance.
    pub fn new(proxy: ProxyConfig) -> HTTPClient {
        HTTPClient { proxy }
    }

    /// Returns the proxy route the client was initialized with.
    pub fn proxy(&self) -> &ProxyConfig { &self.proxy }

    /// Opens a single-use connection to `url` through the configured proxy.
    ///
    /// The connection carries a connect timeout and a read timeout of
    /// 15 000 ms each and keeps no idle sockets alive once dropped.
    ///
    /// # Errors
    /// Fails with a [`TransportError`] if the proxy URL is invalid or the
    /// HTTP stack cannot be assembled.
    pub fn open(&self, url: &Url) -> Result<Connection, TransportError> {
        let builder = reqwest::Client::builder()
            .connect_timeout(TIMEOUT)
            .timeout(TIMEOUT)
            .pool_max_idle_per_host(0);
        let client = self
            .proxy
            .apply(builder)?
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;
        Ok(Connection { client, url: url.clone() })
    }
}

/// A connection to one URL, exclusively owned by the call that opened it.
///
/// Dropping it on any exit path releases the underlying sockets; it must
/// never be shared or reused across calls.
#[derive(Debug)]
pub struct Connection {
    client: reqwest::Client,
    url: Url,
}

impl Connection {
    /// Starts a request of the given method against the connection's URL.
    pub(crate) fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.client.request(method, self.url.clone())
    }

    /// The URL this connection points at.
    pub fn url(&self) -> &Url { &self.url }

    /// The fixed connect timeout of this connection.
    pub fn connect_timeout(&self) -> Duration { TIMEOUT }

    /// The fixed read timeout of this connection.
    pub fn read_timeout(&self) -> Duration { TIMEOUT }
}
