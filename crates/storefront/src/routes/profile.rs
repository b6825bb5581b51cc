//! Shipping profile route handlers.
//!
//! The profile is a set of optional contact defaults reused to pre-fill
//! checkout. Updating it is a plain field-level overwrite.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::profiles::{ProfileRepository, ProfileUpdate};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::UserProfile;
use crate::state::AppState;

/// Pincode length (Indian postal codes).
const PINCODE_LENGTH: usize = 6;

// =============================================================================
// Form Types
// =============================================================================

/// Profile form data. Every field is optional; blanks clear the field.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProfileForm {
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// Field-level errors for the profile form.
#[derive(Debug, Default)]
pub struct ProfileFormErrors {
    pub phone: Option<String>,
    pub pincode: Option<String>,
}

impl ProfileFormErrors {
    /// Whether no field has an error.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.phone.is_none() && self.pincode.is_none()
    }
}

impl ProfileForm {
    /// Validate the form, returning a repository update on success.
    ///
    /// Fields are optional, but when present the phone and pincode must be
    /// well-formed.
    ///
    /// # Errors
    ///
    /// Returns field-level errors for re-rendering on any rule violation.
    pub fn validate(&self) -> std::result::Result<ProfileUpdate, ProfileFormErrors> {
        let mut errors = ProfileFormErrors::default();

        let phone = self.phone.trim();
        if !phone.is_empty() && !phone_shape_ok(phone) {
            errors.phone = Some("Enter a phone number with 10-15 digits.".to_string());
        }

        let pincode = self.pincode.trim();
        if !pincode.is_empty()
            && (pincode.len() != PINCODE_LENGTH || !pincode.chars().all(|c| c.is_ascii_digit()))
        {
            errors.pincode = Some(format!("Enter a {PINCODE_LENGTH}-digit pincode."));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProfileUpdate {
            phone: non_empty(phone),
            address: non_empty(self.address.trim()),
            city: non_empty(self.city.trim()),
            state: non_empty(self.state.trim()),
            pincode: non_empty(pincode),
        })
    }
}

/// Optional leading +, separators allowed, 10-15 digits.
fn phone_shape_ok(phone: &str) -> bool {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    if !rest
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return false;
    }
    let digits = rest.chars().filter(char::is_ascii_digit).count();
    (10..=15).contains(&digits)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Query parameters for flash display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub success: Option<String>,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/show.html")]
pub struct ProfileTemplate {
    pub form: ProfileForm,
    pub errors: ProfileFormErrors,
    pub success: Option<String>,
    pub logged_in: bool,
}

fn form_from_profile(profile: &UserProfile) -> ProfileForm {
    ProfileForm {
        phone: profile.phone.clone().unwrap_or_default(),
        address: profile.address.clone().unwrap_or_default(),
        city: profile.city.clone().unwrap_or_default(),
        state: profile.state.clone().unwrap_or_default(),
        pincode: profile.pincode.clone().unwrap_or_default(),
    }
}

/// Decode a profile-page flash code into display text.
fn success_message(code: &str) -> Option<String> {
    match code {
        "updated" => Some("Profile updated successfully!".to_string()),
        _ => None,
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Display the profile page, pre-filled from the stored profile.
///
/// Creates an empty profile on first visit for accounts that predate one.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let profile = ProfileRepository::new(state.pool())
        .get_or_create(user.id)
        .await?;

    Ok(ProfileTemplate {
        form: form_from_profile(&profile),
        errors: ProfileFormErrors::default(),
        success: query.success.as_deref().and_then(success_message),
        logged_in: true,
    })
}

/// Handle profile form submission.
#[instrument(skip(state, user, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let repo = ProfileRepository::new(state.pool());

    // Make sure the profile row exists before updating it
    repo.get_or_create(user.id).await?;

    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            return Ok(ProfileTemplate {
                form,
                errors,
                success: None,
                logged_in: true,
            }
            .into_response());
        }
    };

    repo.update(user.id, &update).await?;

    Ok(Redirect::to("/profile?success=updated").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_all_blank_is_ok() {
        let update = ProfileForm::default().validate().unwrap();
        assert!(update.phone.is_none());
        assert!(update.pincode.is_none());
    }

    #[test]
    fn test_validate_blanks_clear_fields() {
        let form = ProfileForm {
            phone: "   ".to_string(),
            city: "Pune".to_string(),
            ..ProfileForm::default()
        };
        let update = form.validate().unwrap();
        assert!(update.phone.is_none());
        assert_eq!(update.city.as_deref(), Some("Pune"));
    }

    #[test]
    fn test_validate_bad_phone() {
        let form = ProfileForm {
            phone: "12345".to_string(),
            ..ProfileForm::default()
        };
        assert!(form.validate().unwrap_err().phone.is_some());
    }

    #[test]
    fn test_validate_bad_pincode() {
        let form = ProfileForm {
            pincode: "41101".to_string(),
            ..ProfileForm::default()
        };
        assert!(form.validate().unwrap_err().pincode.is_some());
    }

    #[test]
    fn test_validate_good_values() {
        let form = ProfileForm {
            phone: "+91 98765 43210".to_string(),
            pincode: "411001".to_string(),
            ..ProfileForm::default()
        };
        let update = form.validate().unwrap();
        assert_eq!(update.phone.as_deref(), Some("+91 98765 43210"));
        assert_eq!(update.pincode.as_deref(), Some("411001"));
    }
}
