//! Client error types.
//!
//! Two broad families matter to callers: transport/decode failures surface as
//! generic errors, while non-2xx responses carry the status and the parsed
//! body so callers can special-case e.g. 404 versus everything else. No error
//! here is fatal — every path resolves into caller-visible state.

use thiserror::Error;

use crate::http::Payload;

/// Convenience alias for fallible client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The network call itself failed (unreachable host, TLS, timeout at the
    /// transport layer).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP {status} {status_text}")]
    Http {
        status: u16,
        status_text: String,
        /// Body parsed per its declared content type (JSON or text).
        body: Payload,
    },

    /// The response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request was cancelled before a response was observed.
    #[error("Request cancelled")]
    Cancelled,

    /// The response was well-formed but semantically incomplete
    /// (e.g. an auth response without an access token).
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The configured base URL could not be used.
    #[error("Invalid base URL: {0}")]
    BaseUrl(String),
}

impl ClientError {
    /// HTTP status code, when this error came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is a 404 response.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Best-effort extraction of a server-supplied, user-facing message.
    ///
    /// Error bodies come in several shapes (`{error: {message}}`,
    /// `{message}`, a bare JSON string, or plain text); all are probed
    /// in that order.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Http { body, .. } => body.message(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn http_error(body: Payload) -> ClientError {
        ClientError::Http {
            status: 400,
            status_text: "Bad Request".into(),
            body,
        }
    }

    #[test]
    fn server_message_reads_nested_error_shape() {
        let err = http_error(Payload::Json(json!({"error": {"message": "no stock"}})));
        assert_eq!(err.server_message(), Some("no stock"));
    }

    #[test]
    fn server_message_reads_flat_message_shape() {
        let err = http_error(Payload::Json(json!({"message": "invalid credentials"})));
        assert_eq!(err.server_message(), Some("invalid credentials"));
    }

    #[test]
    fn server_message_reads_plain_text_body() {
        let err = http_error(Payload::Text("service unavailable".into()));
        assert_eq!(err.server_message(), Some("service unavailable"));
    }

    #[test]
    fn server_message_is_none_for_transport_like_errors() {
        assert!(ClientError::Cancelled.server_message().is_none());
        assert!(ClientError::Decode("bad".into()).server_message().is_none());
    }

    #[test]
    fn status_helpers() {
        let err = http_error(Payload::Text(String::new()));
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_not_found());
        assert!(ClientError::Cancelled.status().is_none());
    }
}
