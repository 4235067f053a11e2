//! Database Module
//!
//! SurrealDB connection (in-memory or RocksDB via `DATABASE_URL`), schema and
//! sample data.

pub mod repository;
pub mod seed;

use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};

use crate::core::Config;
use crate::utils::AppError;

/// Table and indexes. Idempotent, applied on every start.
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS ticket SCHEMALESS;
DEFINE INDEX IF NOT EXISTS ticket_requester ON TABLE ticket FIELDS requesterEmail;
DEFINE INDEX IF NOT EXISTS ticket_status ON TABLE ticket FIELDS status;
DEFINE INDEX IF NOT EXISTS ticket_priority ON TABLE ticket FIELDS priority;
DEFINE INDEX IF NOT EXISTS ticket_created_at ON TABLE ticket FIELDS createdAt;
DEFINE INDEX IF NOT EXISTS ticket_assigned_to ON TABLE ticket FIELDS assignedTo;
"#;

/// Database service - owns the SurrealDB handle
#[derive(Clone, Debug)]
pub struct DbService {
    pub db: Surreal<Any>,
}

impl DbService {
    /// Connect, select namespace/database and apply the schema
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let db = any::connect(config.database_url.as_str())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(config.db_namespace.clone())
            .use_db(config.db_name.clone())
            .await
            .map_err(|e| AppError::database(format!("Failed to select database: {e}")))?;

        tracing::info!(
            url = %config.database_url,
            namespace = %config.db_namespace,
            database = %config.db_name,
            "Database connection established"
        );

        let service = Self { db };
        service.apply_schema().await?;
        Ok(service)
    }

    /// Fresh in-memory database with the schema applied
    pub async fn memory() -> Result<Self, AppError> {
        Self::connect(&Config::in_memory()).await
    }

    async fn apply_schema(&self) -> Result<(), AppError> {
        self.db
            .query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");
        Ok(())
    }
}
