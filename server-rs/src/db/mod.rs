//! Persistence layer: the remote table-storage service and the typed repositories on top.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::config::{Config, StoreBackend};

pub mod memory;
pub mod postgres;
pub mod postgrest;
pub mod repository;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use postgrest::PostgrestStore;
pub use repository::{Repository, Resource};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No row matched an id-scoped operation.
    #[error("row not found")]
    NotFound,

    /// Anything else the backend (or the path to it) reported.
    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Table-level operations offered by the backend. Rows are JSON objects.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Inserts one row and returns it as stored, including the generated `id`.
    async fn insert(&self, table: &'static str, row: Value) -> StoreResult<Value>;

    async fn select_all(&self, table: &'static str) -> StoreResult<Vec<Value>>;

    async fn select_by_id(&self, table: &'static str, id: Uuid) -> StoreResult<Value>;

    /// Overwrites the columns present in `row` on the row matching `id`.
    async fn update_by_id(&self, table: &'static str, id: Uuid, row: Value) -> StoreResult<Value>;

    async fn delete_by_id(&self, table: &'static str, id: Uuid) -> StoreResult<()>;

    async fn health_check(&self) -> bool;

    /// Releases backend resources on shutdown.
    async fn close(&self) {}
}

pub async fn create_store(config: &Config) -> StoreResult<Arc<dyn TableStore>> {
    let store: Arc<dyn TableStore> = match config.backend {
        StoreBackend::Postgrest => {
            let rest = config
                .postgrest
                .as_ref()
                .ok_or_else(|| StoreError::Backend("postgrest backend is not configured".into()))?;
            Arc::new(PostgrestStore::new(&rest.url, &rest.service_key)?)
        }
        StoreBackend::Postgres => {
            let db = config
                .db
                .as_ref()
                .ok_or_else(|| StoreError::Backend("postgres backend is not configured".into()))?;
            Arc::new(PgStore::connect(db).await?)
        }
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}
