//! Cart orchestration: cart-code discovery and the add-to-cart flow.
//!
//! The server correlates cart operations through an opaque `cart_code`. The
//! coordinator caches that code in the session store so repeat add-item calls
//! route to the same cart without a discovery round trip, and keeps the
//! last-fetched cart list around for cache-warm rendering.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache;
use crate::error::ClientResult;
use crate::models::cart::Cart;
use crate::models::catalog::ApiId;
use crate::services::CartService;
use crate::store::SessionStore;

/// Coordinates cart calls with the session-scoped caches.
pub struct CartCoordinator {
    cart: CartService,
    store: Arc<dyn SessionStore>,
}

impl CartCoordinator {
    pub fn new(cart: CartService, store: Arc<dyn SessionStore>) -> Self {
        Self { cart, store }
    }

    /// The cached cart code, if one was obtained earlier this session.
    pub fn cached_cart_code(&self) -> Option<String> {
        self.store.get(cache::CART_CODE_KEY)
    }

    fn persist_cart_code(&self, code: &str) {
        self.store.set(cache::CART_CODE_KEY, code);
    }

    /// Resolve a cart code: cache first, else fetch the cart list and take
    /// the first cart's code (the API keeps one cart per user). Best-effort —
    /// a failed lookup resolves to `None` and the add-item call proceeds
    /// without a code.
    pub async fn resolve_cart_code(&self, cancel: &CancellationToken) -> Option<String> {
        if let Some(code) = self.cached_cart_code() {
            return Some(code);
        }
        match self.cart.carts(cancel).await {
            Ok(carts) => {
                if carts.len() > 1 {
                    debug!(carts = carts.len(), "multiple carts returned, using the first");
                }
                let code = carts.first().map(|cart| cart.cart_code.clone())?;
                self.persist_cart_code(&code);
                Some(code)
            }
            Err(err) => {
                debug!(error = %err, "cart-code discovery failed, proceeding without one");
                None
            }
        }
    }

    /// Add a record to the session's cart, persisting the returned cart code
    /// for the rest of the session.
    pub async fn add_to_cart(
        &self,
        record_id: ApiId,
        quantity: Option<u32>,
        cancel: &CancellationToken,
    ) -> ClientResult<Cart> {
        let code = self.resolve_cart_code(cancel).await;
        let cart = self
            .cart
            .add_item(record_id, code.as_deref(), quantity, cancel)
            .await?;
        self.persist_cart_code(&cart.cart_code);
        Ok(cart)
    }

    /// Fetch the cart list, refreshing the session-store snapshot.
    pub async fn carts(&self, cancel: &CancellationToken) -> ClientResult<Vec<Cart>> {
        let carts = self.cart.carts(cancel).await?;
        cache::write_json(self.store.as_ref(), cache::CART_CACHE_KEY, &carts);
        Ok(carts)
    }

    /// Last-fetched cart list, for rendering before the refresh lands.
    pub fn cached_carts(&self) -> Option<Vec<Cart>> {
        cache::read_json(self.store.as_ref(), cache::CART_CACHE_KEY)
    }
}
