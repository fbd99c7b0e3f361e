//! Catalog domain models: records, pagination, and the polymorphic wire
//! fields that come with them.

use serde::{Deserialize, Serialize};

/// An identifier that the API serializes either as an integer or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for ApiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiId::Int(n) => write!(f, "{n}"),
            ApiId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ApiId {
    fn from(value: i64) -> Self {
        ApiId::Int(value)
    }
}

impl From<&str> for ApiId {
    fn from(value: &str) -> Self {
        ApiId::Text(value.into())
    }
}

/// A price that arrives either as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    /// Numeric value, when the underlying representation parses as one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PriceValue::Number(n) => Some(*n),
            PriceValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Genre as sent by the API: a name, a bare id, or a nested object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Genre {
    Name(String),
    Id(i64),
    Object {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<ApiId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
    },
}

impl Genre {
    /// Display label, resolved once at the boundary.
    pub fn label(&self) -> Option<String> {
        match self {
            Genre::Name(name) => Some(name.clone()),
            Genre::Id(id) => Some(id.to_string()),
            Genre::Object { name, .. } => name.clone(),
        }
    }
}

/// Release date as sent by the API: a date string or a bare year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReleaseDate {
    Text(String),
    Year(i64),
}

impl ReleaseDate {
    pub fn label(&self) -> String {
        match self {
            ReleaseDate::Text(s) => s.clone(),
            ReleaseDate::Year(y) => y.to_string(),
        }
    }
}

/// Reference to the artist of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: ApiId,
    pub name: String,
    pub slug: String,
}

/// Reference to the category a record belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: ApiId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A catalog record. Immutable snapshot — never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: ApiId,
    pub title: String,
    pub condition: String,
    pub category: CategoryRef,
    pub artist: ArtistRef,
    pub price: PriceValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub slug: String,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<ReleaseDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_inside: Option<u32>,
    // The wire field is spelled "genere" by the API.
    #[serde(default, rename = "genere", skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
}

impl Record {
    /// Price after applying a positive discount percentage, floored at zero.
    ///
    /// Returns `None` only when the price representation is not numeric.
    pub fn effective_price(&self) -> Option<f64> {
        let price = self.price.as_f64()?;
        match self.discount_percentage {
            Some(discount) if discount > 0.0 => {
                Some((price * (1.0 - discount / 100.0)).max(0.0))
            }
            _ => Some(price),
        }
    }

    /// Whether a positive discount applies.
    pub fn has_discount(&self) -> bool {
        self.discount_percentage.is_some_and(|d| d > 0.0)
    }
}

/// One page of a paginated record listing.
///
/// `next`/`previous` presence drives pagination controls; `results` never
/// exceeds `count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Record>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(price: serde_json::Value, discount: Option<f64>) -> Record {
        let mut value = json!({
            "id": "r1",
            "title": "Rumours",
            "condition": "VG+",
            "category": {"id": 1, "name": "Rock", "slug": "rock"},
            "artist": {"id": "a1", "name": "Fleetwood Mac", "slug": "fleetwood-mac"},
            "price": price,
            "slug": "rumours",
            "stock": 3
        });
        if let Some(d) = discount {
            value["discount_percentage"] = json!(d);
        }
        serde_json::from_value(value).expect("record fixture")
    }

    #[test]
    fn effective_price_applies_discount() {
        let r = record(json!(14.99), Some(10.0));
        let price = r.effective_price().expect("numeric price");
        assert!((price - 13.491).abs() < 1e-9, "got {price}");
        assert!(r.has_discount());
    }

    #[test]
    fn effective_price_without_discount_is_list_price() {
        let r = record(json!(14.99), None);
        assert_eq!(r.effective_price(), Some(14.99));
        assert!(!r.has_discount());
    }

    #[test]
    fn effective_price_parses_numeric_strings() {
        let r = record(json!("250.00"), Some(50.0));
        assert_eq!(r.effective_price(), Some(125.0));
    }

    #[test]
    fn effective_price_is_floored_at_zero() {
        let r = record(json!(10.0), Some(150.0));
        assert_eq!(r.effective_price(), Some(0.0));
    }

    #[test]
    fn effective_price_is_none_for_non_numeric_text() {
        let r = record(json!("call us"), None);
        assert_eq!(r.effective_price(), None);
    }

    #[test]
    fn zero_discount_does_not_count_as_discount() {
        let r = record(json!(9.99), Some(0.0));
        assert_eq!(r.effective_price(), Some(9.99));
        assert!(!r.has_discount());
    }

    #[test]
    fn genre_union_resolves_labels() {
        let by_name: Genre = serde_json::from_value(json!("Soul")).expect("genre");
        assert_eq!(by_name.label(), Some("Soul".into()));

        let by_id: Genre = serde_json::from_value(json!(7)).expect("genre");
        assert_eq!(by_id.label(), Some("7".into()));

        let by_object: Genre =
            serde_json::from_value(json!({"id": 7, "name": "Soul", "slug": "soul"}))
                .expect("genre");
        assert_eq!(by_object.label(), Some("Soul".into()));

        let empty_object: Genre = serde_json::from_value(json!({})).expect("genre");
        assert_eq!(empty_object.label(), None);
    }

    #[test]
    fn record_deserializes_with_polymorphic_fields() {
        let r: Record = serde_json::from_value(json!({
            "id": 42,
            "title": "Siembra",
            "condition": "NM",
            "category": {"id": "salsa", "name": "Salsa", "slug": "salsa",
                          "description": "Salsa dura", "image_url": "http://img/salsa.jpg"},
            "artist": {"id": 9, "name": "Willie Colón", "slug": "willie-colon"},
            "price": "320.50",
            "slug": "siembra",
            "stock": 0,
            "release_date": 1978,
            "items_inside": 1,
            "genere": {"name": "Salsa"}
        }))
        .expect("record");
        assert_eq!(r.id, ApiId::Int(42));
        assert_eq!(r.price.as_f64(), Some(320.5));
        assert_eq!(r.release_date, Some(ReleaseDate::Year(1978)));
        assert_eq!(r.genre.as_ref().and_then(Genre::label), Some("Salsa".into()));
    }

    #[test]
    fn record_page_roundtrips_pagination_links() {
        let page: RecordPage = serde_json::from_value(json!({
            "count": 1,
            "next": null,
            "previous": "http://localhost:8008/records/?page=1",
            "results": []
        }))
        .expect("page");
        assert_eq!(page.count, 1);
        assert!(page.next.is_none());
        assert!(page.previous.is_some());
    }
}
