//! Cart endpoints: list carts, add an item.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::TokenGetter;
use crate::error::ClientResult;
use crate::http::{ApiRequest, HttpClient};
use crate::models::cart::{AddItemRequest, Cart};
use crate::models::catalog::ApiId;

/// Client for the `/carts/` and `/cart/add/` endpoints.
#[derive(Clone)]
pub struct CartService {
    http: Arc<HttpClient>,
    token_getter: Option<TokenGetter>,
}

impl CartService {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            token_getter: None,
        }
    }

    pub fn with_token_getter(mut self, getter: TokenGetter) -> Self {
        self.token_getter = Some(getter);
        self
    }

    fn token(&self) -> Option<String> {
        self.token_getter.as_ref().and_then(|getter| getter())
    }

    /// List the carts owned by the bearer token.
    pub async fn carts(&self, cancel: &CancellationToken) -> ClientResult<Vec<Cart>> {
        let request = ApiRequest::get("/carts/").bearer(self.token());
        self.http.execute_json(request, cancel).await
    }

    /// Add a record to a cart.
    ///
    /// A zero or absent `quantity` is omitted from the body so the server
    /// default (1) applies. Without a `cart_code` the server creates or
    /// picks a cart and returns its code.
    pub async fn add_item(
        &self,
        record_id: ApiId,
        cart_code: Option<&str>,
        quantity: Option<u32>,
        cancel: &CancellationToken,
    ) -> ClientResult<Cart> {
        let body = AddItemRequest {
            cart_code: cart_code.map(Into::into),
            record_id,
            quantity: quantity.filter(|q| *q > 0),
        };
        let request = ApiRequest::post("/cart/add/")
            .json(&body)?
            .bearer(self.token());
        self.http.execute_json(request, cancel).await
    }
}
