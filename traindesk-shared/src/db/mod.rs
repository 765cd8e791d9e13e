/// Database layer for TrainDesk
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: Embedded sqlx migration runner
///
/// Queries themselves live next to the models in [`crate::models`].
///
/// # Example
///
/// ```no_run
/// use traindesk_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig::new(std::env::var("DATABASE_URL")?)).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
