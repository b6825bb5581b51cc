//! Authentication route handlers.
//!
//! Handles registration, login, and logout. Validation failures re-render
//! the originating page with field-level errors; successful actions redirect
//! with a flash code.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService, MIN_PASSWORD_LENGTH, RegisterInput};
use crate::state::AppState;

/// Username length bounds.
const USERNAME_MIN_LENGTH: usize = 3;
const USERNAME_MAX_LENGTH: usize = 30;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Field-level errors for the registration form.
#[derive(Debug, Default)]
pub struct RegisterFormErrors {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

impl RegisterFormErrors {
    /// Whether no field has an error.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.password_confirm.is_none()
    }
}

impl RegisterForm {
    /// Validate the form, returning the service input on success.
    ///
    /// # Errors
    ///
    /// Returns field-level errors for re-rendering on any rule violation.
    pub fn validate(&self) -> Result<RegisterInput, RegisterFormErrors> {
        let mut errors = RegisterFormErrors::default();

        let username = self.username.trim();
        if username.len() < USERNAME_MIN_LENGTH || username.len() > USERNAME_MAX_LENGTH {
            errors.username = Some(format!(
                "Username must be {USERNAME_MIN_LENGTH}-{USERNAME_MAX_LENGTH} characters."
            ));
        } else if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            errors.username =
                Some("Username may only contain letters, digits, and underscores.".to_string());
        }

        if monsoon_core::Email::parse(self.email.trim()).is_err() {
            errors.email = Some("Enter a valid email address.".to_string());
        }

        if self.password.len() < MIN_PASSWORD_LENGTH {
            errors.password = Some(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters."
            ));
        }

        if self.password_confirm != self.password {
            errors.password_confirm = Some("Passwords do not match.".to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RegisterInput {
            username: username.to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            first_name: self
                .first_name
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_string(),
            last_name: self
                .last_name
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_string(),
        })
    }
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Local path to return to after login.
    pub next: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub next: Option<String>,
    pub username: String,
    pub logged_in: bool,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub errors: RegisterFormErrors,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub logged_in: bool,
}

impl Default for RegisterTemplate {
    fn default() -> Self {
        Self {
            errors: RegisterFormErrors::default(),
            username: String::new(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            logged_in: false,
        }
    }
}

/// Decode a login-page flash code into display text.
fn login_success_message(code: &str) -> Option<String> {
    match code {
        "registered" => Some("Account created! You can now log in.".to_string()),
        _ => None,
    }
}

/// Keep only local absolute paths as post-login redirect targets.
fn sanitize_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//"))
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
///
/// Already-authenticated users are sent back to the home page.
pub async fn register_page(OptionalAuth(auth): OptionalAuth) -> Response {
    if auth.is_some() {
        return Redirect::to("/").into_response();
    }

    RegisterTemplate::default().into_response()
}

/// Handle registration form submission.
#[instrument(skip(state, auth, form))]
pub async fn register(
    State(state): State<AppState>,
    OptionalAuth(auth): OptionalAuth,
    Form(form): Form<RegisterForm>,
) -> Response {
    if auth.is_some() {
        return Redirect::to("/").into_response();
    }

    let rerender = |errors: RegisterFormErrors| {
        RegisterTemplate {
            errors,
            username: form.username.clone(),
            email: form.email.clone(),
            first_name: form.first_name.clone().unwrap_or_default(),
            last_name: form.last_name.clone().unwrap_or_default(),
            logged_in: false,
        }
        .into_response()
    };

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return rerender(errors),
    };

    match AuthService::new(state.pool()).register(&input).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "account created");
            Redirect::to("/login?success=registered").into_response()
        }
        Err(AuthError::UserAlreadyExists) => rerender(RegisterFormErrors {
            username: Some("This username is already taken.".to_string()),
            ..RegisterFormErrors::default()
        }),
        Err(AuthError::InvalidEmail(_)) => rerender(RegisterFormErrors {
            email: Some("Enter a valid email address.".to_string()),
            ..RegisterFormErrors::default()
        }),
        Err(AuthError::WeakPassword(msg)) => rerender(RegisterFormErrors {
            password: Some(msg),
            ..RegisterFormErrors::default()
        }),
        Err(e) => {
            tracing::error!("Registration failed: {e}");
            crate::error::AppError::from(e).into_response()
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// Already-authenticated users are sent back to the home page.
pub async fn login_page(
    OptionalAuth(auth): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> Response {
    if auth.is_some() {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        error: None,
        success: query.success.as_deref().and_then(login_success_message),
        next: sanitize_next(query.next.as_deref()).map(String::from),
        username: String::new(),
        logged_in: false,
    }
    .into_response()
}

/// Handle login form submission.
///
/// Any failure renders the same generic message - whether the username
/// exists is never revealed.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LoginQuery>,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = sanitize_next(query.next.as_deref());

    match AuthService::new(state.pool())
        .login(form.username.trim(), &form.password)
        .await
    {
        Ok(user) => {
            let current_user = CurrentUser::new(user.id, user.username.clone());

            if let Err(e) = set_current_user(&session, &current_user).await {
                tracing::error!("Failed to set session: {e}");
                return LoginTemplate {
                    error: Some("Session error, please try again.".to_string()),
                    success: None,
                    next: next.map(String::from),
                    username: form.username.clone(),
                    logged_in: false,
                }
                .into_response();
            }

            set_sentry_user(&user.id, Some(&user.username));

            Redirect::to(next.unwrap_or("/")).into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            LoginTemplate {
                error: Some("Invalid username or password.".to_string()),
                success: None,
                next: next.map(String::from),
                username: form.username.clone(),
                logged_in: false,
            }
            .into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the session entirely and redirects home.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    clear_sentry_user();

    Redirect::to("/?success=logged-out").into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(username: &str, email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn test_register_valid() {
        let input = form("asha_rao", "asha@example.com", "monsoon-season", "monsoon-season")
            .validate()
            .unwrap();
        assert_eq!(input.username, "asha_rao");
        assert_eq!(input.email, "asha@example.com");
    }

    #[test]
    fn test_register_trims_username() {
        let input = form("  asha  ", "asha@example.com", "monsoon-season", "monsoon-season")
            .validate()
            .unwrap();
        assert_eq!(input.username, "asha");
    }

    #[test]
    fn test_register_short_username() {
        let errors = form("ab", "asha@example.com", "monsoon-season", "monsoon-season")
            .validate()
            .unwrap_err();
        assert!(errors.username.is_some());
        assert!(errors.email.is_none());
    }

    #[test]
    fn test_register_bad_username_characters() {
        let errors = form("asha rao", "asha@example.com", "monsoon-season", "monsoon-season")
            .validate()
            .unwrap_err();
        assert!(errors.username.is_some());
    }

    #[test]
    fn test_register_bad_email() {
        let errors = form("asha", "not-an-email", "monsoon-season", "monsoon-season")
            .validate()
            .unwrap_err();
        assert!(errors.email.is_some());
    }

    #[test]
    fn test_register_short_password() {
        let errors = form("asha", "asha@example.com", "short", "short")
            .validate()
            .unwrap_err();
        assert!(errors.password.is_some());
    }

    #[test]
    fn test_register_password_mismatch() {
        let errors = form("asha", "asha@example.com", "monsoon-season", "different")
            .validate()
            .unwrap_err();
        assert!(errors.password_confirm.is_some());
    }

    #[test]
    fn test_sanitize_next_accepts_local_paths() {
        assert_eq!(sanitize_next(Some("/cart")), Some("/cart"));
        assert_eq!(sanitize_next(Some("/orders?x=1")), Some("/orders?x=1"));
    }

    #[test]
    fn test_sanitize_next_rejects_external_targets() {
        assert_eq!(sanitize_next(Some("https://evil.example")), None);
        assert_eq!(sanitize_next(Some("//evil.example")), None);
        assert_eq!(sanitize_next(None), None);
    }
}
