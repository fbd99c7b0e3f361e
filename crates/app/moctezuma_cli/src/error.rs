use moctezuma_client::ClientError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("{}", user_message(.0))]
    Client(#[from] ClientError),
}

/// Prefer the server-supplied message when one exists; fall back to the
/// client error's own rendering.
fn user_message(err: &ClientError) -> String {
    match err.server_message() {
        Some(message) => message.to_string(),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moctezuma_client::http::Payload;

    #[test]
    fn client_errors_prefer_server_message() {
        let err = Error::from(ClientError::Http {
            status: 400,
            status_text: "Bad Request".into(),
            body: Payload::Json(serde_json::json!({"error": {"message": "sin existencias"}})),
        });
        assert_eq!(err.to_string(), "sin existencias");
    }

    #[test]
    fn client_errors_without_message_render_generically() {
        let err = Error::from(ClientError::Cancelled);
        assert_eq!(err.to_string(), "Request cancelled");
    }
}
