//! Typed errors produced by API requests.

use crate::http::ApiResponse;

/// Errors surfaced by request execution and the resource modules.
///
/// The response-driven variants are chosen solely by HTTP status code and
/// carry the buffered response so callers can inspect the status, headers,
/// and parsed body. Callers are expected to branch on the variant, not on
/// the message text.
#[derive(Debug)]
pub enum Error {
    /// The request was bad (400).
    BadRequest(Box<ApiResponse>),
    /// The request requires user authentication (401).
    Unauthorized(Box<ApiResponse>),
    /// The client is forbidden from making the request (403).
    Forbidden(Box<ApiResponse>),
    /// The API returned a response with an unexpected status.
    UnexpectedResponse(Box<ApiResponse>),
    /// The request was aborted through its terminator before it settled.
    AbortedRequest,
    /// A network-level failure from the transport, passed through unmodified.
    Transport(reqwest::Error),
    /// The request URL could not be parsed.
    InvalidUrl(url::ParseError),
    /// The request URL used a scheme other than http or https.
    UnsupportedProtocol(String),
    /// A request header name or value was malformed.
    InvalidHeader(String),
    /// A successful response body did not match the expected shape.
    Decode(serde_json::Error),
}

impl Error {
    /// The buffered response for response-driven variants.
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Error::BadRequest(response)
            | Error::Unauthorized(response)
            | Error::Forbidden(response)
            | Error::UnexpectedResponse(response) => Some(response.as_ref()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::BadRequest(_) => write!(f, "bad request"),
            Error::Unauthorized(_) => write!(f, "unauthorized"),
            Error::Forbidden(_) => write!(f, "forbidden"),
            Error::UnexpectedResponse(response) => {
                write!(f, "unexpected response (status {})", response.status.as_u16())
            }
            Error::AbortedRequest => write!(f, "request aborted"),
            Error::Transport(err) => write!(f, "transport error: {}", err),
            Error::InvalidUrl(err) => write!(f, "invalid URL: {}", err),
            Error::UnsupportedProtocol(scheme) => {
                write!(f, "unsupported protocol: {}", scheme)
            }
            Error::InvalidHeader(message) => write!(f, "invalid header: {}", message),
            Error::Decode(err) => write!(f, "failed to decode response body: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(err) => Some(err),
            Error::InvalidUrl(err) => Some(err),
            Error::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidUrl(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err)
    }
}
