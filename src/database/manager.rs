use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, Executor, PgPool,
};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AppConfig;

/// Bootstrap schema applied by `init-db`.
const SCHEMA_SQL: &str = include_str!("../../migrations/schema.sql");

/// Errors from the record store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => DatabaseError::Unavailable(err.to_string()),
            sqlx::Error::Database(ref db_err) => {
                let code = db_err.code().map(|c| c.into_owned());
                match code.as_deref().and_then(constraint_message) {
                    Some(message) => {
                        warn!("Constraint violation ({:?}): {}", code, db_err.message());
                        DatabaseError::Constraint(message.to_string())
                    }
                    None => DatabaseError::Sqlx(err),
                }
            }
            other => DatabaseError::Sqlx(other),
        }
    }
}

/// Client-safe message for the SQLSTATE codes reported as `Constraint`.
/// The server log keeps the Postgres detail.
fn constraint_message(code: &str) -> Option<&'static str> {
    match code {
        "23503" => Some("Referenced record does not exist"),
        "23505" => Some("Duplicate value"),
        "23514" => Some("Value violates a check constraint"),
        _ => None,
    }
}

impl From<crate::filter::FilterError> for DatabaseError {
    fn from(err: crate::filter::FilterError) -> Self {
        DatabaseError::InvalidFilter(err.to_string())
    }
}

/// Builds and maintains the shared connection pool
pub struct DatabaseManager;

impl DatabaseManager {
    /// Build the pool without connecting; the first query opens a connection.
    pub fn connect_lazy(config: &AppConfig) -> Result<PgPool, DatabaseError> {
        url::Url::parse(&config.database.url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let mut options: PgConnectOptions = config.database.url.parse().map_err(DatabaseError::from)?;
        if !config.database.enable_query_logging {
            options = options.disable_statement_logging();
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
            .connect_lazy_with(options);

        info!(
            "Created database pool for {} (max {} connections)",
            config.redacted_database_url(),
            config.database.max_connections
        );
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Apply the bootstrap schema. Statements are idempotent (`IF NOT EXISTS`).
    pub async fn init_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        pool.execute(SCHEMA_SQL).await?;
        info!("Applied bootstrap schema");
        Ok(())
    }

    pub async fn close(pool: &PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_maps_to_unavailable() {
        let err = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DatabaseError::Unavailable(_)));
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[test]
    fn constraint_messages_hide_postgres_detail() {
        assert_eq!(constraint_message("23503"), Some("Referenced record does not exist"));
        assert_eq!(constraint_message("23505"), Some("Duplicate value"));
        assert_eq!(constraint_message("23514"), Some("Value violates a check constraint"));
        assert_eq!(constraint_message("42P01"), None);
        for code in ["23503", "23505", "23514"] {
            let message = constraint_message(code).unwrap_or_default();
            assert!(!message.contains("members") && !message.contains("_fkey"));
        }
    }

    #[test]
    fn rejects_malformed_url() {
        let mut config = AppConfig::development();
        config.database.url = "not a url".to_string();
        assert!(matches!(DatabaseManager::connect_lazy(&config), Err(DatabaseError::InvalidDatabaseUrl)));
    }

    #[test]
    fn schema_creates_every_table() {
        for table in [
            "users", "masjids", "members", "life_events", "businesses",
            "restaurants", "restaurant_menus", "masjid_shura_members", "educations",
        ] {
            assert!(
                SCHEMA_SQL.contains(&format!("CREATE TABLE IF NOT EXISTS {}", table)),
                "missing table {}",
                table
            );
        }
    }
}
