//! Domain models for the storefront.
//!
//! These are the row types the repositories return. They derive
//! `sqlx::FromRow` so runtime `query_as` calls can map them directly, and
//! they carry the little domain logic this application has (effective
//! prices, line totals).

pub mod cart;
pub mod catalog;
pub mod order;
pub mod session;
pub mod user;

pub use cart::{CartEntry, CartLine, cart_total};
pub use catalog::{Category, Product, effective_price};
pub use order::{Order, OrderItem, OrderItemDetail, ShippingDetails};
pub use session::{CurrentUser, session_keys};
pub use user::{User, UserProfile};
