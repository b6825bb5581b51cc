//! Session-stored types and keys.

use serde::{Deserialize, Serialize};

use monsoon_core::UserId;

/// Keys under which values are stored in the tower-sessions session.
pub mod session_keys {
    /// The logged-in user, a [`super::CurrentUser`].
    pub const CURRENT_USER: &str = "current_user";
}

/// The logged-in user as carried in the session.
///
/// Deliberately small: just enough to identify the user and greet them.
/// Everything else is loaded from the database per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The user's database ID.
    pub id: UserId,
    /// The user's login name, for display in the navigation bar.
    pub username: String,
}

impl CurrentUser {
    /// Create a new session user record.
    #[must_use]
    pub const fn new(id: UserId, username: String) -> Self {
        Self { id, username }
    }
}
