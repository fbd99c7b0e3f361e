//! Cart domain models.
//!
//! Carts are server-owned: the client never computes totals, it only displays
//! the values the server sends back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{ApiId, PriceValue, Record};

/// A server-owned cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: ApiId,
    pub user: ApiId,
    /// Opaque correlation token for routing repeat add-item calls to the
    /// same cart. Persisted client-side for the rest of the session.
    pub cart_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cart_items: Vec<CartItem>,
    pub total_price: PriceValue,
}

impl Cart {
    /// Total number of units across all items.
    pub fn total_items(&self) -> u32 {
        self.cart_items.iter().map(|item| item.quantity).sum()
    }
}

/// One line in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ApiId,
    pub record: Record,
    pub quantity: u32,
    pub subtotal: PriceValue,
}

/// Request body for `POST /cart/add/`.
///
/// `quantity` is omitted entirely when absent so the server default applies.
#[derive(Debug, Clone, Serialize)]
pub struct AddItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_code: Option<String>,
    pub record_id: ApiId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_item_request_omits_absent_fields() {
        let body = serde_json::to_value(AddItemRequest {
            cart_code: None,
            record_id: ApiId::Int(5),
            quantity: None,
        })
        .expect("serialize");
        assert_eq!(body, json!({"record_id": 5}));
    }

    #[test]
    fn add_item_request_includes_present_fields() {
        let body = serde_json::to_value(AddItemRequest {
            cart_code: Some("cc-123".into()),
            record_id: ApiId::Text("r1".into()),
            quantity: Some(2),
        })
        .expect("serialize");
        assert_eq!(
            body,
            json!({"cart_code": "cc-123", "record_id": "r1", "quantity": 2})
        );
    }

    #[test]
    fn cart_deserializes_and_counts_items() {
        let cart: Cart = serde_json::from_value(json!({
            "id": 1,
            "user": 7,
            "cart_code": "cc-123",
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:30:00Z",
            "total_price": "449.00",
            "cart_items": [
                {
                    "id": 10,
                    "quantity": 2,
                    "subtotal": 299.0,
                    "record": {
                        "id": "r1",
                        "title": "Rumours",
                        "condition": "VG+",
                        "category": {"id": 1, "name": "Rock", "slug": "rock"},
                        "artist": {"id": 2, "name": "Fleetwood Mac", "slug": "fleetwood-mac"},
                        "price": 149.5,
                        "slug": "rumours",
                        "stock": 3
                    }
                },
                {
                    "id": 11,
                    "quantity": 1,
                    "subtotal": "150.00",
                    "record": {
                        "id": "r2",
                        "title": "Siembra",
                        "condition": "NM",
                        "category": {"id": 2, "name": "Salsa", "slug": "salsa"},
                        "artist": {"id": 3, "name": "Willie Colón", "slug": "willie-colon"},
                        "price": "150.00",
                        "slug": "siembra",
                        "stock": 1
                    }
                }
            ]
        }))
        .expect("cart");
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price.as_f64(), Some(449.0));
    }
}
