//! Business services for the storefront.
//!
//! - [`auth`] - registration and login on top of the user repository
//! - [`checkout`] - the cart-to-order workflow

pub mod auth;
pub mod checkout;
