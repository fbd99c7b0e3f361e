//! Session management.
//!
//! [`SessionManager`] owns the current tokens and user profile, mirrors every
//! change to an injected [`SessionStore`], and exposes login / register /
//! logout. It is constructed explicitly by the composition root and handed to
//! dependents — there is no ambient global.
//!
//! Invariant: a session holding a token always holds a user. When the API
//! omits a user object from an auth response, one is synthesized from the
//! submitted credentials.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache;
use crate::error::ClientResult;
use crate::models::auth::{AuthTokens, Credentials, RegisterInput, User};
use crate::services::{AuthService, TokenGetter};
use crate::store::SessionStore;

/// The persisted / in-memory session shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Holder of the current session, shared process-wide behind an `Arc`.
pub struct SessionManager {
    state: Mutex<SessionState>,
    store: Arc<dyn SessionStore>,
    auth: AuthService,
}

impl SessionManager {
    /// Build a manager, restoring any persisted session from the store.
    ///
    /// A malformed persisted entry, or one without a token, yields an empty
    /// session — restoration never fails.
    pub fn new(auth: AuthService, store: Arc<dyn SessionStore>) -> Self {
        let restored = cache::read_json::<SessionState>(store.as_ref(), cache::SESSION_KEY)
            .filter(|state| state.token.is_some())
            .unwrap_or_default();
        if restored.token.is_some() {
            debug!("session restored from store");
        }
        Self {
            state: Mutex::new(restored),
            store,
            auth,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current access token.
    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    /// Current refresh token.
    pub fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    /// Current user profile.
    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    /// Whether a session is active.
    pub fn is_authenticated(&self) -> bool {
        self.lock().token.is_some()
    }

    /// A [`TokenGetter`] bound to this manager, for injecting into services.
    pub fn token_getter(self: &Arc<Self>) -> TokenGetter {
        let manager = Arc::clone(self);
        Arc::new(move || manager.token())
    }

    /// Exchange credentials for a session. The service error propagates
    /// untouched on failure so callers can surface the server message.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<()> {
        let cancel = CancellationToken::new();
        let tokens = self.auth.login(credentials, &cancel).await?;
        let user = tokens
            .user
            .clone()
            .unwrap_or_else(|| synthesize_user(&credentials.email));
        info!(user = %user.name, "login succeeded");
        self.replace(session_from(tokens, user));
        Ok(())
    }

    /// Create an account and open a session.
    pub async fn register(&self, payload: &RegisterInput) -> ClientResult<()> {
        let cancel = CancellationToken::new();
        let tokens = self.auth.register(payload, &cancel).await?;
        let user = tokens.user.clone().unwrap_or_else(|| User {
            id: None,
            name: payload.username.clone(),
            email: Some(payload.email.clone()),
        });
        info!(user = %user.name, "registration succeeded");
        self.replace(session_from(tokens, user));
        Ok(())
    }

    /// Clear the session, in memory and in the store. Never contacts the
    /// network.
    pub fn logout(&self) {
        info!("logout");
        self.replace(SessionState::default());
    }

    /// Replace the session wholesale and mirror the change to the store:
    /// written when a token is present, removed otherwise.
    fn replace(&self, next: SessionState) {
        if next.token.is_some() {
            cache::write_json(self.store.as_ref(), cache::SESSION_KEY, &next);
        } else {
            self.store.remove(cache::SESSION_KEY);
        }
        *self.lock() = next;
    }
}

fn session_from(tokens: AuthTokens, user: User) -> SessionState {
    SessionState {
        token: Some(tokens.access_token),
        refresh_token: tokens.refresh_token,
        user: Some(user),
    }
}

/// Fall back to a profile derived from the submitted email: the local part
/// as display name, "Usuario" when that is empty.
fn synthesize_user(email: &str) -> User {
    let local = email.split('@').next().unwrap_or_default();
    User {
        id: None,
        name: if local.is_empty() {
            "Usuario".into()
        } else {
            local.into()
        },
        email: Some(email.into()),
    }
}
