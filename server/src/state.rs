use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::services::{attendance::AttendanceService, identity::IdentityService};
use crate::utils::error::AppError;

/// Process-wide dependencies, built once at startup and handed to every
/// handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    schema: Arc<OnceCell<()>>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            schema: Arc::new(OnceCell::new()),
        }
    }

    /// Creates the schema on first use; later calls return immediately.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        self.schema
            .get_or_try_init(|| async {
                db::ensure_schema(&self.pool).await.map_err(|e| {
                    AppError::InternalServerError(format!("schema migration failed: {e}"))
                })?;
                info!("Database schema ready");
                Ok::<(), AppError>(())
            })
            .await
            .map(|_| ())
    }

    pub fn identity(&self) -> IdentityService {
        IdentityService::new(self.pool.clone(), self.config.legacy_plaintext_passwords)
    }

    pub fn attendance(&self) -> AttendanceService {
        AttendanceService::new(self.pool.clone())
    }
}
