//! Checkout route handlers.
//!
//! `GET /checkout` shows the cart summary and a shipping form pre-filled
//! from the user's account and profile. `POST /checkout` validates the form
//! and hands the cart-to-order transition to the checkout service. An empty
//! cart short-circuits both with a redirect to the catalog - no writes, no
//! validation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use monsoon_core::Email;

use crate::db::cart::CartRepository;
use crate::db::profiles::ProfileRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CartEntry, ShippingDetails, UserProfile, cart_total};
use crate::routes::cart::CartItemView;
use crate::services::checkout::{CheckoutError, CheckoutService};
use crate::state::AppState;

/// Where empty-cart checkouts are sent.
const EMPTY_CART_REDIRECT: &str = "/products?error=empty-cart";

/// Pincode length (Indian postal codes).
const PINCODE_LENGTH: usize = 6;

/// Phone number digit bounds.
const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX_DIGITS: usize = 15;

// =============================================================================
// Form Types
// =============================================================================

/// Checkout form data, exactly as submitted.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// Field-level errors for the checkout form.
#[derive(Debug, Default)]
pub struct CheckoutFormErrors {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

impl CheckoutFormErrors {
    /// Whether no field has an error.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.pincode.is_none()
    }
}

impl CheckoutForm {
    /// Validate the form, returning checkout-ready shipping details.
    ///
    /// # Errors
    ///
    /// Returns field-level errors for re-rendering on any rule violation.
    pub fn validate(&self) -> std::result::Result<ShippingDetails, CheckoutFormErrors> {
        let mut errors = CheckoutFormErrors::default();

        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            errors.full_name = Some("Full name is required.".to_string());
        }

        let email = match Email::parse(self.email.trim()) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.email = Some("Enter a valid email address.".to_string());
                None
            }
        };

        let phone = self.phone.trim();
        if !is_valid_phone(phone) {
            errors.phone = Some(format!(
                "Enter a phone number with {PHONE_MIN_DIGITS}-{PHONE_MAX_DIGITS} digits."
            ));
        }

        let address = self.address.trim();
        if address.is_empty() {
            errors.address = Some("Address is required.".to_string());
        }

        let city = self.city.trim();
        if city.is_empty() {
            errors.city = Some("City is required.".to_string());
        }

        let state = self.state.trim();
        if state.is_empty() {
            errors.state = Some("State is required.".to_string());
        }

        let pincode = self.pincode.trim();
        if !is_valid_pincode(pincode) {
            errors.pincode = Some(format!("Enter a {PINCODE_LENGTH}-digit pincode."));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        // A parse failure always records a field error above
        let Some(email) = email else {
            return Err(errors);
        };

        Ok(ShippingDetails {
            full_name: full_name.to_string(),
            email,
            phone: phone.to_string(),
            address: address.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            pincode: pincode.to_string(),
        })
    }
}

/// A phone number: optional leading +, separators allowed, 10-15 digits.
fn is_valid_phone(phone: &str) -> bool {
    if phone.is_empty() {
        return false;
    }
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    if !rest
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return false;
    }
    let digits = rest.chars().filter(char::is_ascii_digit).count();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

/// A pincode: exactly six ASCII digits.
fn is_valid_pincode(pincode: &str) -> bool {
    pincode.len() == PINCODE_LENGTH && pincode.chars().all(|c| c.is_ascii_digit())
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub form: CheckoutForm,
    pub errors: CheckoutFormErrors,
    pub logged_in: bool,
}

/// Build form defaults from the user's account and shipping profile.
fn prefill(display_name: String, email: &Email, profile: &UserProfile) -> CheckoutForm {
    CheckoutForm {
        full_name: display_name,
        email: email.to_string(),
        phone: profile.phone.clone().unwrap_or_default(),
        address: profile.address.clone().unwrap_or_default(),
        city: profile.city.clone().unwrap_or_default(),
        state: profile.state.clone().unwrap_or_default(),
        pincode: profile.pincode.clone().unwrap_or_default(),
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Display the checkout page.
///
/// An empty cart is refused up front with a warning on the catalog page.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let entries = CartRepository::new(state.pool()).entries(user.id).await?;

    if entries.is_empty() {
        return Ok(Redirect::to(EMPTY_CART_REDIRECT).into_response());
    }

    let account = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::Internal("session user missing from database".to_string()))?;
    let profile = ProfileRepository::new(state.pool())
        .get_or_create(user.id)
        .await?;

    let form = prefill(account.display_name(), &account.email, &profile);

    Ok(render(&entries, form, CheckoutFormErrors::default()).into_response())
}

/// Handle checkout form submission.
#[instrument(skip(state, user, form))]
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let entries = CartRepository::new(state.pool()).entries(user.id).await?;

    if entries.is_empty() {
        return Ok(Redirect::to(EMPTY_CART_REDIRECT).into_response());
    }

    let details = match form.validate() {
        Ok(details) => details,
        Err(errors) => return Ok(render(&entries, form, errors).into_response()),
    };

    match CheckoutService::new(state.pool())
        .place_order(user.id, &details)
        .await
    {
        Ok(order) => Ok(Redirect::to(&format!("/order/{}?success=placed", order.id)).into_response()),
        // The cart emptied between our read and the transaction (e.g. a
        // concurrent checkout won the race) - refuse, nothing was written.
        Err(CheckoutError::EmptyCart) => Ok(Redirect::to(EMPTY_CART_REDIRECT).into_response()),
        Err(CheckoutError::Repository(e)) => Err(AppError::Database(e)),
    }
}

/// Render the checkout page with the given form state.
fn render(entries: &[CartEntry], form: CheckoutForm, errors: CheckoutFormErrors) -> CheckoutTemplate {
    CheckoutTemplate {
        items: entries.iter().map(CartItemView::from).collect(),
        total: filters::format_money(cart_total(entries)),
        form,
        errors,
        logged_in: true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            full_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+91 98765 43210".to_string(),
            address: "14 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
        }
    }

    #[test]
    fn test_validate_ok() {
        let details = valid_form().validate().unwrap();
        assert_eq!(details.full_name, "Asha Rao");
        assert_eq!(details.email.as_str(), "asha@example.com");
        assert_eq!(details.pincode, "560001");
    }

    #[test]
    fn test_validate_trims_fields() {
        let mut form = valid_form();
        form.city = "  Bengaluru  ".to_string();
        assert_eq!(form.validate().unwrap().city, "Bengaluru");
    }

    #[test]
    fn test_validate_required_fields() {
        let mut form = valid_form();
        form.full_name = "   ".to_string();
        form.address = String::new();
        let errors = form.validate().unwrap_err();
        assert!(errors.full_name.is_some());
        assert!(errors.address.is_some());
        assert!(errors.city.is_none());
    }

    #[test]
    fn test_validate_bad_email() {
        let mut form = valid_form();
        form.email = "not-an-email".to_string();
        assert!(form.validate().unwrap_err().email.is_some());
    }

    #[test]
    fn test_validate_bad_pincode() {
        for bad in ["5600", "56000a", "5600011"] {
            let mut form = valid_form();
            form.pincode = bad.to_string();
            assert!(form.validate().unwrap_err().pincode.is_some(), "{bad}");
        }
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("+91 98765 43210"));
        assert!(is_valid_phone("98765-43210"));
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("phone-number"));
        assert!(!is_valid_phone("1234567890123456"));
    }

    #[test]
    fn test_pincode_validation() {
        assert!(is_valid_pincode("560001"));
        assert!(!is_valid_pincode("56001"));
        assert!(!is_valid_pincode("56000x"));
    }
}
