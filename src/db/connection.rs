use std::time::Duration;

use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

use crate::config::DatabaseConfig;
use crate::error::DbError;

pub async fn make_pool(cfg: &DatabaseConfig) -> Result<MySqlPool, DbError> {
    let max_conn: u32 = match std::env::var("TRACT_MATCHER_POOL_SIZE") {
        Ok(s) => match s.parse::<u32>() {
            Ok(v) if v > 0 => v,
            _ => {
                log::warn!("Invalid TRACT_MATCHER_POOL_SIZE='{}'; using default", s);
                4
            }
        },
        // A single batch run issues two sequential queries; a small pool suffices.
        Err(_) => 4,
    };
    let acquire_ms: u64 = std::env::var("TRACT_MATCHER_ACQUIRE_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30_000);

    let pool = MySqlPoolOptions::new()
        .max_connections(max_conn)
        .acquire_timeout(Duration::from_millis(acquire_ms))
        .connect(&cfg.to_url())
        .await
        .map_err(|e| DbError::Connection(e.to_string()))?;
    Ok(pool)
}
