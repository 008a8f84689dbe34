//! Database Module
//!
//! Handles the embedded SurrealDB instance (RocksDB backend)

pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {e}")))?;

        db.use_ns("retail")
            .use_db("backoffice")
            .await
            .map_err(|e| AppError::Database(format!("Failed to select namespace: {e}")))?;

        tracing::info!("Database connection established (SurrealDB RocksDB)");

        Self::bootstrap_schema(&db).await?;

        Ok(Self { db })
    }

    /// Define the tables and indexes the aggregation queries touch.
    ///
    /// Tables stay schemaless; the indexes cover the time-range predicates
    /// every statistics query filters on.
    async fn bootstrap_schema(db: &Surreal<Db>) -> Result<(), AppError> {
        db.query(
            r#"
            DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS order_end_time ON order FIELDS end_time;
            DEFINE TABLE IF NOT EXISTS item SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS has_item TYPE RELATION IN order OUT item;
            DEFINE TABLE IF NOT EXISTS member SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS member_created_at ON member FIELDS created_at;
        "#,
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to bootstrap schema: {e}")))?;

        tracing::info!("Database schema bootstrapped");
        Ok(())
    }
}
