/// PostgreSQL connection pool
///
/// The pool is created once at startup and shared through the API state.
/// Acquiring a connection is bounded by `acquire_timeout_seconds`, so a
/// saturated pool surfaces as an error instead of an unbounded wait.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the database connection pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Idle connections kept warm
    pub min_connections: u32,

    /// How long a caller waits for a free connection (seconds)
    pub acquire_timeout_seconds: u64,

    /// Idle connections older than this are closed (seconds)
    pub idle_timeout_seconds: Option<u64>,
}

impl DatabaseConfig {
    /// Default pool settings for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 5,
            idle_timeout_seconds: Some(600),
        }
    }
}

/// Creates the pool and verifies connectivity
///
/// # Errors
///
/// Returns an error if the URL is invalid, the server is unreachable, or the
/// health check query fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout_seconds = config.acquire_timeout_seconds,
        "Creating database connection pool"
    );

    let mut pool_options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));

    if let Some(idle_timeout) = config.idle_timeout_seconds {
        pool_options = pool_options.idle_timeout(Duration::from_secs(idle_timeout));
        debug!(idle_timeout_seconds = idle_timeout, "Set idle timeout");
    }

    let pool = pool_options.connect(&config.url).await?;
    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Runs `SELECT 1` against the pool
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!(value = result.0, "Database health check returned unexpected value");
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Closes all connections; called on shutdown
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout_seconds, 5);
        assert_eq!(config.idle_timeout_seconds, Some(600));
    }

    #[test]
    fn test_database_config_new_keeps_defaults() {
        let config = DatabaseConfig::new("postgres://localhost/traindesk");
        assert_eq!(config.url, "postgres://localhost/traindesk");
        assert_eq!(config.max_connections, DatabaseConfig::default().max_connections);
    }
}
