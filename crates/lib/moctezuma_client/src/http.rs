//! HTTP wrapper around the remote API.
//!
//! One [`ApiRequest`] describes one network round trip: final URL built from
//! the base origin plus path and query entries, JSON headers, optional bearer
//! token, optional JSON body. Responses are parsed per their declared content
//! type and non-2xx statuses become [`ClientError::Http`] carrying the parsed
//! body. Cancellation is cooperative via [`CancellationToken`]: a cancelled
//! call returns [`ClientError::Cancelled`] and its response is never observed.

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// A response body, parsed per the response's declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `Content-Type` contained `application/json`.
    Json(Value),
    /// Anything else is kept as plain text.
    Text(String),
}

impl Payload {
    /// The JSON value, when this payload is JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    /// Best-effort extraction of a human-readable message.
    ///
    /// Probes `{error: {message}}`, then `{message}`, then a bare JSON
    /// string; text payloads are returned as-is when non-empty.
    pub fn message(&self) -> Option<&str> {
        match self {
            Payload::Json(value) => value
                .pointer("/error/message")
                .or_else(|| value.pointer("/message"))
                .or(Some(value))
                .and_then(Value::as_str),
            Payload::Text(text) if !text.is_empty() => Some(text),
            Payload::Text(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Request description
// ---------------------------------------------------------------------------

/// Description of a single API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    token: Option<String>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            token: None,
        }
    }

    /// A GET request for `path` (relative to the base origin).
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request for `path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append a query parameter. Numbers and booleans are stringified.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present.
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body. Implies `Content-Type: application/json`.
    pub fn json<B: Serialize>(mut self, body: &B) -> ClientResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::Decode(format!("serialize request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Attach a bearer token, when one is available.
    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client bound to a base origin.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a client for the given base origin.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::BaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::BaseUrl(format!(
                "not an origin: {base_url}"
            )));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Create a client from a [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(&config.base_url)
    }

    /// Build the final URL: base origin + path segments + query entries.
    ///
    /// Path segments are percent-encoded individually, so identifiers coming
    /// from user input are safe to embed. A trailing slash in `path` is
    /// preserved — the API routes all end in one.
    pub(crate) fn endpoint_url(&self, path: &str, query: &[(String, String)]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ClientError::BaseUrl(format!("not an origin: {}", self.base_url)))?;
            segments.pop_if_empty();
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
            if path.ends_with('/') {
                segments.push("");
            }
        }
        for (key, value) in query {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    /// Perform one network round trip and parse the response body.
    ///
    /// Exactly one request is issued per invocation; there is no retry layer.
    pub async fn execute(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> ClientResult<Payload> {
        let url = self.endpoint_url(&request.path, &request.query)?;
        debug!(method = %request.method, url = %url, "issuing API request");

        let mut builder = self
            .client
            .request(request.method, url)
            .header(ACCEPT, "application/json");
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = tokio::select! {
            () = cancel.cancelled() => return Err(ClientError::Cancelled),
            result = builder.send() => result?,
        };

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let raw = tokio::select! {
            () = cancel.cancelled() => return Err(ClientError::Cancelled),
            body = response.text() => body?,
        };

        let payload = if is_json {
            serde_json::from_str(&raw)
                .map(Payload::Json)
                .map_err(|e| ClientError::Decode(format!("response is not valid JSON: {e}")))?
        } else {
            Payload::Text(raw)
        };

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().into(),
                body: payload,
            });
        }

        Ok(payload)
    }

    /// Perform a round trip and deserialize the JSON response into `T`.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> ClientResult<T> {
        match self.execute(request, cancel).await? {
            Payload::Json(value) => serde_json::from_value(value)
                .map_err(|e| ClientError::Decode(format!("unexpected response shape: {e}"))),
            Payload::Text(_) => Err(ClientError::Decode(
                "expected a JSON response, got text".into(),
            )),
        }
    }
}
