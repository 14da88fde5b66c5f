use std::env;
use std::fmt;

/// Immutable record describing which backend environment requests target.
///
/// Bundles the hostnames of the four cooperating services together with a
/// display name (e.g. `"production"` or `"staging"`). Constructed once at
/// startup and shared read-only by all callers.
///
/// # Fields
/// - `auth_host`: Host serving authentication requests.
/// - `accounts_host`: Host serving account management requests.
/// - `session_host`: Host serving session requests.
/// - `services_host`: Host serving the remaining profile services.
/// - `name`: Human-readable environment name used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct EnvironmentConfig {
    auth_host: String,
    accounts_host: String,
    session_host: String,
    services_host: String,
    name: String,
}

impl EnvironmentConfig {
    /// Creates a new environment record from the five host/name strings.
    pub fn new(
        auth_host: impl Into<String>,
        accounts_host: impl Into<String>,
        session_host: impl Into<String>,
        services_host: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            auth_host: auth_host.into(),
            accounts_host: accounts_host.into(),
            session_host: session_host.into(),
            services_host: services_host.into(),
            name: name.into(),
        }
    }

    /// Reads the environment record from the `AUTHLINK_*` process
    /// environment variables.
    ///
    /// # Errors
    /// Fails with the underlying [`env::VarError`] if any of the five
    /// variables is missing or not valid unicode.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            auth_host: env::var("AUTHLINK_AUTH_HOST")?,
            accounts_host: env::var("AUTHLINK_ACCOUNTS_HOST")?,
            session_host: env::var("AUTHLINK_SESSION_HOST")?,
            services_host: env::var("AUTHLINK_SERVICES_HOST")?,
            name: env::var("AUTHLINK_ENV_NAME")?,
        })
    }

    pub fn auth_host(&self) -> &str { &self.auth_host }
    pub fn accounts_host(&self) -> &str { &self.accounts_host }
    pub fn session_host(&self) -> &str { &self.session_host }
    pub fn services_host(&self) -> &str { &self.services_host }
    pub fn name(&self) -> &str { &self.name }
}

impl fmt::Display for EnvironmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "authHost='{}', accountsHost='{}', sessionHost='{}', servicesHost='{}', name='{}'",
            self.auth_host, self.accounts_host, self.session_host, self.services_host, self.name
        )
    }
}
