//! Database migration command.
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded into
//! this binary at compile time. They are never run automatically on
//! storefront startup; this command is the only way to apply them.

use secrecy::ExposeSecret;
use sqlx::PgPool;

use super::{CliError, database_url};

/// Run the storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), CliError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
