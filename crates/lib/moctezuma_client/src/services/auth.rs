//! Auth endpoints: login, register, token refresh, profile lookup.

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::ClientResult;
use crate::http::{ApiRequest, HttpClient};
use crate::models::auth::{AuthResponse, AuthTokens, Credentials, RegisterInput, User};

#[derive(Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

/// Client for the `/auth/*` endpoints.
#[derive(Clone)]
pub struct AuthService {
    http: Arc<HttpClient>,
}

impl AuthService {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Exchange credentials for tokens (and, when the API sends one, a user).
    pub async fn login(
        &self,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> ClientResult<AuthTokens> {
        let request = ApiRequest::post("/auth/login/").json(credentials)?;
        let response: AuthResponse = self.http.execute_json(request, cancel).await?;
        response.into_tokens()
    }

    /// Create an account and exchange it for tokens.
    pub async fn register(
        &self,
        payload: &RegisterInput,
        cancel: &CancellationToken,
    ) -> ClientResult<AuthTokens> {
        let request = ApiRequest::post("/auth/register/").json(payload)?;
        let response: AuthResponse = self.http.execute_json(request, cancel).await?;
        response.into_tokens()
    }

    /// Exchange a refresh token for a fresh token pair.
    pub async fn refresh(
        &self,
        refresh_token: Option<&str>,
        cancel: &CancellationToken,
    ) -> ClientResult<AuthTokens> {
        let request = ApiRequest::post("/auth/refresh/").json(&RefreshRequest { refresh_token })?;
        let response: AuthResponse = self.http.execute_json(request, cancel).await?;
        response.into_tokens()
    }

    /// Fetch the profile behind a bearer token.
    pub async fn profile(&self, token: &str, cancel: &CancellationToken) -> ClientResult<User> {
        let request = ApiRequest::get("/auth/me/").bearer(Some(token.into()));
        self.http.execute_json(request, cancel).await
    }
}
