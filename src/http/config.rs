//! Request descriptor parsing.
//!
//! Turns a caller-facing [`RequestInput`] (a URL string or a structured
//! description) into the canonical [`RequestConfig`] consumed by the
//! executor. Parsing is pure and synchronous; it fails only on malformed
//! URLs, unsupported schemes, or malformed headers.

use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::errors::Error;
use crate::http::request::{AbortHandle, Terminator};

/// The closed set of transports a request can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    /// Parses a URL scheme, rejecting anything outside the supported set.
    pub fn from_scheme(scheme: &str) -> Result<Self, Error> {
        match scheme {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(Error::UnsupportedProtocol(other.to_string())),
        }
    }

    pub fn scheme(self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// The port used when the URL does not name one.
    pub fn default_port(self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

/// Canonical, transport-ready description of a single request.
///
/// Produced by [`parse_config`] and consumed by the executor; the descriptor
/// is the single source of truth for the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub protocol: Protocol,
    pub hostname: String,
    pub port: u16,
    pub method: Method,
    /// Request path including any percent-encoded query string.
    pub path: String,
    pub headers: HeaderMap,
    /// Present iff the input supplied it.
    pub with_credentials: Option<bool>,
}

impl RequestConfig {
    /// Reassembles the transport URL from the descriptor fields.
    pub fn transport_url(&self) -> String {
        format!(
            "{}://{}:{}{}",
            self.protocol.scheme(),
            self.hostname,
            self.port,
            self.path
        )
    }
}

/// Caller-facing request description, before normalization.
///
/// A bare URL converts via `From`; the struct form adds query parameters,
/// extra headers, a credentials flag, and a cancellation hook.
#[derive(Default)]
pub struct RequestInput {
    pub url: String,
    /// Query entries merged into (and overriding) the URL's query string.
    pub query: Vec<(String, String)>,
    /// Extra headers merged over the defaults.
    pub headers: Vec<(String, String)>,
    pub with_credentials: Option<bool>,
    /// Cancellation hook, invoked once with an abort handle before I/O.
    pub terminator: Option<Terminator>,
}

impl RequestInput {
    pub fn new(url: impl Into<String>) -> Self {
        RequestInput {
            url: url.into(),
            ..RequestInput::default()
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = Some(with_credentials);
        self
    }

    pub fn terminator(mut self, terminator: impl FnOnce(AbortHandle) + Send + 'static) -> Self {
        self.terminator = Some(Box::new(terminator));
        self
    }
}

impl From<&str> for RequestInput {
    fn from(url: &str) -> Self {
        RequestInput::new(url)
    }
}

impl From<String> for RequestInput {
    fn from(url: String) -> Self {
        RequestInput::new(url)
    }
}

impl std::fmt::Debug for RequestInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestInput")
            .field("url", &self.url)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .field("with_credentials", &self.with_credentials)
            .field("terminator", &self.terminator.is_some())
            .finish()
    }
}

/// Normalizes a request input into a transport-ready descriptor.
///
/// Query entries from the input override same-named parameters already in
/// the URL in place; new keys append in order. The merged query string is
/// re-encoded deterministically, with spaces as `%20`. The method is always
/// GET and the headers always carry `accept: application/json` unless the
/// input overrides it.
pub fn parse_config(input: &RequestInput) -> Result<RequestConfig, Error> {
    let url = Url::parse(&input.url)?;
    let protocol = Protocol::from_scheme(url.scheme())?;
    let hostname = url
        .host_str()
        .ok_or(Error::InvalidUrl(url::ParseError::EmptyHost))?
        .to_string();
    let port = url.port().unwrap_or_else(|| protocol.default_port());

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    for (key, value) in &input.query {
        match pairs.iter_mut().find(|(existing, _)| existing == key) {
            Some(entry) => entry.1 = value.clone(),
            None => pairs.push((key.clone(), value.clone())),
        }
    }

    let mut path = url.path().to_string();
    if !pairs.is_empty() {
        let query: Vec<String> = pairs
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect();
        path.push('?');
        path.push_str(&query.join("&"));
    }

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    for (name, value) in &input.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| Error::InvalidHeader(format!("{}: {}", name, err)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| Error::InvalidHeader(format!("{}: {}", name, err)))?;
        headers.insert(name, value);
    }

    Ok(RequestConfig {
        protocol,
        hostname,
        port,
        method: Method::GET,
        path,
        headers,
        with_credentials: input.with_credentials,
    })
}
