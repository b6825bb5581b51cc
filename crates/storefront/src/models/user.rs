//! User and profile domain types.

use chrono::{DateTime, Utc};

use monsoon_core::{Email, ProfileId, UserId};

/// A storefront user account.
///
/// The password hash lives in a separate `user_passwords` table and never
/// leaves the auth service.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Contact email.
    pub email: Email,
    /// Optional given name, empty when not provided.
    pub first_name: String,
    /// Optional family name, empty when not provided.
    pub last_name: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// "First Last" when names are set, else the username.
    ///
    /// Used to pre-fill the checkout form's full name field.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

/// A user's shipping profile.
///
/// One-to-one with the user account, created empty at registration. The
/// fields are optional contact defaults reused to pre-fill checkout; they
/// are never read back by the order pages (orders carry their own
/// snapshots).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfile {
    /// Unique profile ID.
    pub id: ProfileId,
    /// Owning user.
    pub user_id: UserId,
    /// Contact phone.
    pub phone: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State.
    pub state: Option<String>,
    /// Postal code.
    pub pincode: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use monsoon_core::Email;

    fn user(first: &str, last: &str) -> User {
        User {
            id: UserId::new(1),
            username: "asha".to_string(),
            email: Email::parse("asha@example.com").unwrap(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_with_names() {
        assert_eq!(user("Asha", "Rao").display_name(), "Asha Rao");
    }

    #[test]
    fn test_display_name_partial() {
        assert_eq!(user("Asha", "").display_name(), "Asha");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        assert_eq!(user("", "").display_name(), "asha");
    }
}
