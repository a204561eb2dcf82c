use crate::error::AppError;
use sqlx::PgPool;
use std::time::Duration;
use tripcompass_shared::{DB_ACQUIRE_TIMEOUT_SECS, DB_MAX_CONNECTIONS};

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, AppError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(DB_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(DB_ACQUIRE_TIMEOUT_SECS))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    /// Wrap an already-connected pool (used by the test harness).
    pub fn from_pool(pool: PgPool) -> Self {
        Database { pool }
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
