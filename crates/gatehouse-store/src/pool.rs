//! Database connection pool

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Database connection pool type alias
pub type DbPool = PgPool;

/// Acquire timeout for pool checkouts
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a connection pool sized for the calling service.
///
/// Auth flows hold connections briefly (single-statement lookups plus
/// the rotation transaction), so a modest pool suffices; the caller
/// picks `max_connections` from its own config.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}
