//! Profile repository.
//!
//! Profiles normally come into existence alongside the account, but
//! `get_or_create` tolerates accounts that predate the profile table.

use sqlx::PgPool;

use monsoon_core::UserId;

use super::RepositoryError;
use crate::models::UserProfile;

/// Field-level update for a shipping profile.
///
/// `None` clears a field; there is no partial update - the profile form
/// always submits every field.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

/// Repository for shipping profile operations.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r"
            SELECT id, user_id, phone, address, city, state, pincode,
                   created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    /// Get a user's profile, creating an empty one if it doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<UserProfile, RepositoryError> {
        if let Some(profile) = self.get(user_id).await? {
            return Ok(profile);
        }

        sqlx::query(
            r"
            INSERT INTO user_profiles (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .execute(self.pool)
        .await?;

        self.get(user_id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Overwrite the profile's contact fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no profile row.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, RepositoryError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r"
            UPDATE user_profiles
            SET phone = $1, address = $2, city = $3, state = $4, pincode = $5,
                updated_at = NOW()
            WHERE user_id = $6
            RETURNING id, user_id, phone, address, city, state, pincode,
                      created_at, updated_at
            ",
        )
        .bind(update.phone.as_deref())
        .bind(update.address.as_deref())
        .bind(update.city.as_deref())
        .bind(update.state.as_deref())
        .bind(update.pincode.as_deref())
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(profile)
    }
}
