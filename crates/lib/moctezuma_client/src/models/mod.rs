//! Domain models.
//!
//! Wire shapes from the API are polymorphic in places (prices may be numbers
//! or numeric strings, genres may be strings, numbers, or objects). Those are
//! captured as untagged sum types and resolved once at the service boundary
//! via the accessors here — nothing deeper in the call chain deals with
//! ambiguous typing.

pub mod auth;
pub mod cart;
pub mod catalog;

pub use auth::{AuthResponse, AuthTokens, Credentials, RegisterInput, User};
pub use cart::{AddItemRequest, Cart, CartItem};
pub use catalog::{ApiId, ArtistRef, CategoryRef, Genre, PriceValue, Record, RecordPage, ReleaseDate};
