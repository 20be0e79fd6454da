use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, StoreResult, TableStore};

/// In-process tables. Rows keep insertion order, which is the list order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<&'static str, Vec<Map<String, Value>>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn into_object(row: Value) -> StoreResult<Map<String, Value>> {
    match row {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Backend(format!(
            "expected a JSON object row, got {other}"
        ))),
    }
}

fn matches_id(row: &Map<String, Value>, id: &str) -> bool {
    row.get("id").and_then(Value::as_str) == Some(id)
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn insert(&self, table: &'static str, row: Value) -> StoreResult<Value> {
        let mut row = into_object(row)?;
        row.insert("id".into(), Value::String(Uuid::new_v4().to_string()));

        let mut tables = self.tables.write().await;
        tables.entry(table).or_default().push(row.clone());
        Ok(Value::Object(row))
    }

    async fn select_all(&self, table: &'static str) -> StoreResult<Vec<Value>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default())
    }

    async fn select_by_id(&self, table: &'static str, id: Uuid) -> StoreResult<Value> {
        let id = id.to_string();
        let tables = self.tables.read().await;
        tables
            .get(table)
            .and_then(|rows| rows.iter().find(|r| matches_id(r, &id)))
            .cloned()
            .map(Value::Object)
            .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(&self, table: &'static str, id: Uuid, row: Value) -> StoreResult<Value> {
        let changes = into_object(row)?;
        let id = id.to_string();

        let mut tables = self.tables.write().await;
        let existing = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| matches_id(r, &id)))
            .ok_or(StoreError::NotFound)?;

        for (column, value) in changes {
            if column != "id" {
                existing.insert(column, value);
            }
        }
        Ok(Value::Object(existing.clone()))
    }

    async fn delete_by_id(&self, table: &'static str, id: Uuid) -> StoreResult<()> {
        let id = id.to_string();
        let mut tables = self.tables.write().await;
        let rows = tables.get_mut(table).ok_or(StoreError::NotFound)?;
        let index = rows
            .iter()
            .position(|r| matches_id(r, &id))
            .ok_or(StoreError::NotFound)?;
        rows.remove(index);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
