use super::common::URLError;
use crate::fatal;
use url::Url;
use url::form_urlencoded;

/// Ordered key/value pairs for a URL query string.
///
/// A key without a value renders as a bare key (`flag` instead of `flag=`).
/// Pairs keep the order the caller appended them in.
#[derive(Debug, Clone, Default)]
pub struct QueryParameters {
    pairs: Vec<(String, Option<String>)>,
}

impl QueryParameters {
    pub fn new() -> Self { Self::default() }

    /// Appends a `key=value` pair.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), Some(value.into())));
    }

    /// Appends a key-only parameter.
    pub fn append_flag(&mut self, key: impl Into<String>) {
        self.pairs.push((key.into(), None));
    }

    pub fn is_empty(&self) -> bool { self.pairs.is_empty() }

    /// Renders the parameters as an encoded & escaped query string.
    pub fn build(&self) -> String { build_query(self) }
}

/// Turns the given parameters into an encoded & escaped query string.
///
/// Keys and values are encoded per `application/x-www-form-urlencoded`
/// rules; encoding a Rust string cannot fail, so every pair always makes it
/// into the output. Empty input yields an empty string.
pub fn build_query(query: &QueryParameters) -> String {
    let mut built = String::new();
    for (key, value) in &query.pairs {
        if !built.is_empty() {
            built.push('&');
        }
        built.extend(form_urlencoded::byte_serialize(key.as_bytes()));
        if let Some(value) = value {
            built.push('=');
            built.extend(form_urlencoded::byte_serialize(value.as_bytes()));
        }
    }
    built
}

/// Concatenates the given URL and query.
///
/// Appends with `&` when the URL already carries a non-empty query and with
/// `?` otherwise.
///
/// # Errors
/// Fails with a [`URLError`] if the combination is not a well-formed URL.
pub fn concatenate_url(url: &Url, query: &str) -> Result<Url, URLError> {
    let mut raw = url.as_str().to_string();
    match url.query() {
        Some(existing) if !existing.is_empty() => raw.push('&'),
        // the URL already ends with a bare '?'
        Some(_) => {}
        None => raw.push('?'),
    }
    raw.push_str(query);
    Url::parse(&raw).map_err(URLError::Malformed)
}

/// Parses a statically-known-valid URL literal.
///
/// Intended for constants only; a parse failure here is a configuration
/// error and aborts instead of surfacing a `Result`.
pub fn constant_url(url: &str) -> Url {
    Url::parse(url).unwrap_or_else(|e| fatal!("Couldn't create constant URL {url}: {e}"))
}
