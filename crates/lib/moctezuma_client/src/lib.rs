//! # moctezuma_client
//!
//! Typed client for the Moctezuma record shop API.
//!
//! The crate is a thin, well-typed layer over the remote REST API: an HTTP
//! wrapper with cooperative cancellation ([`http`]), a session manager with a
//! pluggable persistence port ([`session`], [`store`]), domain services that
//! each perform exactly one network call ([`services`]), and two small state
//! machines for driving fetches and imperative actions ([`query`],
//! [`mutation`]). All pricing, inventory, and cart totals are computed by the
//! server; this client only normalizes and displays them.

pub mod cache;
pub mod cart_flow;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod mutation;
pub mod query;
pub mod services;
pub mod session;
pub mod store;

pub use error::ClientError;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
