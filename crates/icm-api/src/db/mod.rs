//! # Database Persistence Layer
//!
//! Postgres adapter for the store ports via SQLx.
//!
//! The database is optional. With `DATABASE_URL` set the API reads the
//! catalog, the cross-reference graph, tenant evidence and settings from
//! Postgres. Without it the API serves the seed catalog from memory.
//!
//! Queries are runtime-checked (`query_as` with `FromRow` rows) so the crate
//! builds without a live database.

pub mod seed;
pub mod settings;
pub mod store;

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use icm_gap::StoreError;

pub use seed::{write_catalog, SeedReport};
pub use settings::PgSettingsStore;
pub use store::PgStore;

/// Connect to Postgres and apply the embedded migrations.
pub async fn init_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// Map a driver error onto the store port's error type.
///
/// Connection-level failures become [`StoreError::Unavailable`]; everything
/// else is a backend error carrying the driver's message.
pub fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::warn!(error = %err, "database unreachable");
            StoreError::Unavailable
        }
        other => StoreError::Backend(other.to_string()),
    }
}

/// Error for a row whose column fails domain validation.
pub(crate) fn decode_error(column: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(format!("invalid {column} in database row: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_unavailable() {
        assert_eq!(store_error(sqlx::Error::PoolTimedOut), StoreError::Unavailable);
        assert_eq!(store_error(sqlx::Error::PoolClosed), StoreError::Unavailable);
    }

    #[test]
    fn other_failures_are_backend_errors() {
        assert!(matches!(
            store_error(sqlx::Error::RowNotFound),
            StoreError::Backend(_)
        ));
    }
}
