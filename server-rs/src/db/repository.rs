use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{StoreError, StoreResult, TableStore};

/// A record type stored in its own backend table.
pub trait Resource: DeserializeOwned + Send + Sync {
    const TABLE: &'static str;
    /// Human-readable name used in error details.
    const ENTITY: &'static str;
    /// Create/replace body; carries every column except `id`.
    type Payload: Serialize + Send + Sync;
}

/// Typed CRUD over one table of a [`TableStore`].
pub struct Repository<R> {
    store: Arc<dyn TableStore>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Repository<R> {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    pub async fn create(&self, payload: &R::Payload) -> StoreResult<R> {
        let row = self.store.insert(R::TABLE, encode(payload)?).await?;
        decode(row)
    }

    pub async fn list(&self) -> StoreResult<Vec<R>> {
        self.store
            .select_all(R::TABLE)
            .await?
            .into_iter()
            .map(decode::<R>)
            .collect()
    }

    pub async fn get(&self, id: Uuid) -> StoreResult<R> {
        let row = self.store.select_by_id(R::TABLE, id).await?;
        decode(row)
    }

    pub async fn replace(&self, id: Uuid, payload: &R::Payload) -> StoreResult<R> {
        let row = self.store.update_by_id(R::TABLE, id, encode(payload)?).await?;
        decode(row)
    }

    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.store.delete_by_id(R::TABLE, id).await
    }
}

fn encode<T: Serialize>(payload: &T) -> StoreResult<Value> {
    serde_json::to_value(payload)
        .map_err(|e| StoreError::Backend(format!("failed to encode row: {e}")))
}

fn decode<R: DeserializeOwned>(row: Value) -> StoreResult<R> {
    serde_json::from_value(row)
        .map_err(|e| StoreError::Backend(format!("failed to decode row: {e}")))
}
