//! Connection pool utilities

use crate::error::{SqlError, SqlResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Default pool size used by [`create_pool`].
pub const DEFAULT_MAX_CONNECTIONS: usize = 16;

/// Create a connection pool from a database URL.
///
/// Uses `NoTls`, which suits the local socket URLs the application defaults
/// to (`postgresql:///savour`).
///
/// # Example
///
/// ```ignore
/// let pool = savour_sql::create_pool("postgresql:///savour")?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(database_url: &str) -> SqlResult<Pool> {
    create_pool_with_config(database_url, DEFAULT_MAX_CONNECTIONS)
}

/// Create a connection pool with an explicit size.
pub fn create_pool_with_config(database_url: &str, max_size: usize) -> SqlResult<Pool> {
    if max_size == 0 {
        return Err(SqlError::config("pool size must be at least 1"));
    }

    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| SqlError::Connection(e.to_string()))?;

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, NoTls, manager_config);
    Pool::builder(mgr)
        .max_size(max_size)
        .build()
        .map_err(|e| SqlError::Pool(e.to_string()))
}
