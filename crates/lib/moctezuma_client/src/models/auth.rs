//! Authentication domain models and the raw auth wire shapes.

use serde::{Deserialize, Serialize};

use super::catalog::ApiId;
use crate::error::{ClientError, ClientResult};

/// A user profile.
///
/// Either sourced from an auth response or synthesized from the submitted
/// credentials when the API omits a user object (in which case `id` is
/// absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ApiId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub username: String,
}

/// Tokens (and optional user) extracted from a successful auth response.
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
}

/// Raw wire shape of the auth endpoints' responses.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub tokens: Option<TokenPair>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The `tokens` object inside an auth response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl AuthResponse {
    /// Map the raw response into [`AuthTokens`], failing when the access
    /// token is missing.
    pub fn into_tokens(self) -> ClientResult<AuthTokens> {
        let tokens = self.tokens.unwrap_or(TokenPair {
            access: None,
            refresh: None,
        });
        let access_token = tokens.access.ok_or_else(|| {
            ClientError::UnexpectedResponse("missing access token in auth response".into())
        })?;
        Ok(AuthTokens {
            access_token,
            refresh_token: tokens.refresh,
            user: self.user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn into_tokens_extracts_access_refresh_and_user() {
        let response: AuthResponse = serde_json::from_value(json!({
            "tokens": {"access": "acc", "refresh": "ref"},
            "user": {"id": 1, "name": "Rosa", "email": "rosa@example.com"}
        }))
        .expect("auth response");
        let tokens = response.into_tokens().expect("tokens");
        assert_eq!(tokens.access_token, "acc");
        assert_eq!(tokens.refresh_token.as_deref(), Some("ref"));
        assert_eq!(tokens.user.expect("user").name, "Rosa");
    }

    #[test]
    fn into_tokens_fails_without_access_token() {
        let response: AuthResponse =
            serde_json::from_value(json!({"message": "ok"})).expect("auth response");
        assert!(matches!(
            response.into_tokens(),
            Err(ClientError::UnexpectedResponse(_))
        ));

        let refresh_only: AuthResponse =
            serde_json::from_value(json!({"tokens": {"refresh": "ref"}})).expect("auth response");
        assert!(refresh_only.into_tokens().is_err());
    }
}
