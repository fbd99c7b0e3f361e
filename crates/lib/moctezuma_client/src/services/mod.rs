//! Domain services.
//!
//! Each service is a stateless wrapper over the HTTP client with a fixed set
//! of REST endpoints and typed request/response shapes — pure translation
//! layers, no logic beyond response normalization (plus the catalog's
//! best-effort 404 fallback).

pub mod auth;
pub mod cart;
pub mod catalog;

use std::sync::Arc;

pub use auth::AuthService;
pub use cart::CartService;
pub use catalog::CatalogService;

/// Supplier of the current bearer token, injected by the composition root
/// (usually [`crate::session::SessionManager::token_getter`]).
pub type TokenGetter = Arc<dyn Fn() -> Option<String> + Send + Sync>;
