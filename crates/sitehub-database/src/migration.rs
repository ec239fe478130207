//! Embedded schema migrations.

use sqlx::PgPool;
use tracing::info;

use sitehub_core::error::{AppError, ErrorKind};

/// Apply any pending migrations from the workspace `migrations/`
/// directory. Safe to call on every startup; already-applied
/// migrations are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Schema migration failed", e))?;

    info!("Schema is up to date");
    Ok(())
}
