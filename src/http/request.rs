//! Request execution and response classification.
//!
//! [`execute`] drives the full lifecycle of one request: it rebuilds the
//! transport URL from the descriptor, issues the request, buffers the body,
//! attempts a JSON decode with a raw-text fallback, and classifies the
//! result by status code. The returned future settles exactly once; a
//! terminator hook can abort it cooperatively before completion.

use log::debug;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::errors::Error;
use crate::http::config::{RequestConfig, RequestInput, parse_config};

/// A handle that aborts the request it was issued for.
///
/// Cloneable and safe to call from any task. Aborting after the request has
/// settled is a no-op.
#[derive(Debug, Clone)]
pub struct AbortHandle {
    token: CancellationToken,
}

impl AbortHandle {
    fn new() -> Self {
        AbortHandle {
            token: CancellationToken::new(),
        }
    }

    pub fn abort(&self) {
        self.token.cancel();
    }
}

/// Cancellation hook supplied by the caller, invoked exactly once with the
/// request's [`AbortHandle`] before any I/O happens.
pub type Terminator = Box<dyn FnOnce(AbortHandle) + Send>;

/// A buffered response body: parsed JSON, or the raw text when the body is
/// not valid JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text),
        }
    }
}

/// A completed, fully buffered response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// Deserializes the buffered body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        match &self.body {
            ResponseBody::Json(value) => Ok(serde_json::from_value(value.clone())?),
            ResponseBody::Text(text) => Ok(serde_json::from_str(text)?),
        }
    }
}

/// Classifies a completed response by status code.
///
/// 2xx is success; 400, 401, and 403 map to their dedicated variants; every
/// other status is an unexpected response. Total over the status codes a
/// real transport can produce.
pub fn classify(response: ApiResponse) -> Result<ApiResponse, Error> {
    if response.status.is_success() {
        return Ok(response);
    }
    match response.status.as_u16() {
        400 => Err(Error::BadRequest(Box::new(response))),
        401 => Err(Error::Unauthorized(Box::new(response))),
        403 => Err(Error::Forbidden(Box::new(response))),
        _ => Err(Error::UnexpectedResponse(Box::new(response))),
    }
}

/// Executes a single request described by `config`.
///
/// The transport request is built from the descriptor fields only. If a
/// terminator is supplied it is invoked once with an [`AbortHandle`]; an
/// abort racing the in-flight request wins and rejects with
/// [`Error::AbortedRequest`], and any transport events after settlement are
/// discarded. Network-level failures pass through as [`Error::Transport`].
/// There is no retry and no implicit timeout.
#[tracing::instrument(skip(client, config, terminator))]
pub async fn execute(
    client: &Client,
    config: RequestConfig,
    terminator: Option<Terminator>,
) -> Result<ApiResponse, Error> {
    let url = config.transport_url();
    debug!("{} {}...", config.method, url);

    let send = async {
        let response = client
            .request(config.method, url.as_str())
            .headers(config.headers)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;
        let body = match serde_json::from_str::<Value>(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        };

        Ok::<ApiResponse, Error>(ApiResponse {
            status,
            headers,
            body,
        })
    };

    let response = match terminator {
        Some(terminator) => {
            let handle = AbortHandle::new();
            let token = handle.token.clone();
            terminator(handle);
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("{} aborted", url);
                    return Err(Error::AbortedRequest);
                }
                response = send => response?,
            }
        }
        None => send.await?,
    };

    classify(response)
}

/// Parses the input and executes the resulting request on a fresh transport
/// client. Each call owns its connection for the request's lifetime; no
/// pooling contract is implied between calls.
#[tracing::instrument(skip(input))]
pub async fn request(input: impl Into<RequestInput>) -> Result<ApiResponse, Error> {
    let mut input = input.into();
    let terminator = input.terminator.take();
    let config = parse_config(&input)?;
    execute(&Client::new(), config, terminator).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Accepts one connection and never responds, to keep a request in
    /// flight while a terminator fires.
    async fn hanging_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let _conn = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        (addr, task)
    }

    #[tokio::test]
    async fn test_request_success_json_body() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/meta")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "20240101_abc", "count": 2}"#)
            .create_async()
            .await;

        let response = request(format!("{}/meta", server.url()).as_str())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status.as_u16(), 200);
        let body = response.body.as_json().unwrap();
        assert_eq!(body["id"], "20240101_abc");
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn test_request_falls_back_to_text_body() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/meta")
            .with_status(200)
            .with_body("plain text, not json")
            .create_async()
            .await;

        let response = request(format!("{}/meta", server.url()).as_str())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.body.as_text().unwrap(), "plain text, not json");
    }

    #[tokio::test]
    async fn test_request_sends_merged_query_and_headers() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/search?foo=bar&bam=baz")
            .match_header("accept", "application/json")
            .match_header("x-request-id", "abc")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let input = RequestInput::new(format!("{}/search?foo=bar", server.url()))
            .query("bam", "baz")
            .header("x-request-id", "abc");
        request(input).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bad_request_carries_parsed_body() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/meta")
            .with_status(400)
            .with_body(r#"{"message": "missing parameter"}"#)
            .create_async()
            .await;

        let err = request(format!("{}/meta", server.url()).as_str())
            .await
            .unwrap_err();

        mock.assert_async().await;
        match err {
            Error::BadRequest(response) => {
                assert_eq!(response.status.as_u16(), 400);
                let body = response.body.as_json().unwrap();
                assert_eq!(body["message"], "missing parameter");
            }
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_and_forbidden() {
        let mut server = mockito::Server::new_async().await;

        let unauthorized = server
            .mock("GET", "/secret")
            .with_status(401)
            .create_async()
            .await;
        let err = request(format!("{}/secret", server.url()).as_str())
            .await
            .unwrap_err();
        unauthorized.assert_async().await;
        assert!(matches!(err, Error::Unauthorized(_)));

        let forbidden = server
            .mock("GET", "/secret")
            .with_status(403)
            .create_async()
            .await;
        let err = request(format!("{}/secret", server.url()).as_str())
            .await
            .unwrap_err();
        forbidden.assert_async().await;
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_other_statuses_are_unexpected() {
        let mut server = mockito::Server::new_async().await;

        for status in [404, 418, 500, 503] {
            let mock = server
                .mock("GET", "/meta")
                .with_status(status)
                .create_async()
                .await;
            let err = request(format!("{}/meta", server.url()).as_str())
                .await
                .unwrap_err();
            mock.assert_async().await;
            match err {
                Error::UnexpectedResponse(response) => {
                    assert_eq!(response.status.as_u16(), status as u16);
                }
                other => panic!("expected UnexpectedResponse, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_terminator_aborts_in_flight_request() {
        let (addr, server) = hanging_server().await;

        let input = RequestInput::new(format!("http://{}/slow", addr)).terminator(|handle| {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                handle.abort();
            });
        });

        let err = request(input).await.unwrap_err();
        assert!(matches!(err, Error::AbortedRequest));
        server.abort();
    }

    #[tokio::test]
    async fn test_immediate_abort_wins() {
        let (addr, server) = hanging_server().await;

        let input =
            RequestInput::new(format!("http://{}/slow", addr)).terminator(|handle| handle.abort());

        let err = request(input).await.unwrap_err();
        assert!(matches!(err, Error::AbortedRequest));
        server.abort();
    }

    #[tokio::test]
    async fn test_abort_after_settlement_is_noop() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/meta")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let captured: Arc<Mutex<Option<AbortHandle>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&captured);
        let input = RequestInput::new(format!("{}/meta", server.url())).terminator(move |handle| {
            *slot.lock().unwrap() = Some(handle);
        });

        let response = request(input).await.unwrap();
        mock.assert_async().await;
        assert_eq!(response.status.as_u16(), 200);

        let handle = captured.lock().unwrap().take().unwrap();
        handle.abort();
        handle.abort();
    }

    #[tokio::test]
    async fn test_network_failure_passes_through_as_transport() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = request(format!("http://{}/meta", addr).as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_parse_failure_surfaces_before_io() {
        let err = request("not a url").await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_classify_success_range() {
        for status in [200, 201, 204, 299] {
            let response = ApiResponse {
                status: StatusCode::from_u16(status).unwrap(),
                headers: HeaderMap::new(),
                body: ResponseBody::Text(String::new()),
            };
            assert!(classify(response).is_ok());
        }
    }

    #[test]
    fn test_api_response_json_decodes_text_body() {
        let response = ApiResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: ResponseBody::Text("[1, 2, 3]".to_string()),
        };
        let values: Vec<u32> = response.json().unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }
}
