//! CLI subcommands.

pub mod migrate;
pub mod seed;

use std::path::PathBuf;

/// Errors shared by the CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid fixture file: {0}")]
    Fixture(#[from] serde_yaml::Error),
}

/// Read the storefront database URL from the environment.
///
/// Checks `STOREFRONT_DATABASE_URL` first, then the generic `DATABASE_URL`.
pub fn database_url() -> Result<secrecy::SecretString, CliError> {
    let _ = dotenvy::dotenv();

    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(secrecy::SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("STOREFRONT_DATABASE_URL"))
}
