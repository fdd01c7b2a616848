//! Database connection pool management
//!
//! Uses sqlx PgPool with the limits carried by [`DbConfig`]. The pool is
//! created once in `main` and closed before exit.

use marketseed_core::DbConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::debug;

/// Create a PostgreSQL connection pool.
///
/// Connection failures are returned immediately; there is no retry.
///
/// # Example
///
/// ```ignore
/// let config = DbConfig::from_env(&PoolConfig::default())?;
/// let pool = create_pool(&config).await?;
/// ```
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    debug!(
        max_connections = config.max_connections,
        idle_timeout = ?config.idle_timeout,
        connect_timeout = ?config.connect_timeout,
        "creating connection pool"
    );
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(config.idle_timeout)
        .acquire_timeout(config.connect_timeout)
        .connect(&config.database_url)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketseed_core::PoolConfig;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p marketseed-db -- --ignored

    fn config() -> DbConfig {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        DbConfig::new(url, &PoolConfig::default())
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let pool = create_pool(&config()).await.expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
        pool.close().await;
    }

    #[tokio::test]
    async fn unreachable_host_fails_fast() {
        let pool_config = PoolConfig {
            connect_timeout_secs: 1,
            ..PoolConfig::default()
        };
        let config = DbConfig::new("postgres://nobody@127.0.0.1:1/none", &pool_config);

        assert!(create_pool(&config).await.is_err());
    }
}
