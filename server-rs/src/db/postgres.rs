use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use uuid::Uuid;

use super::{StoreError, StoreResult, TableStore};
use crate::config::DbConfig;

/// Direct Postgres access for deployments that hand out a connection string
/// instead of the REST gateway. Rows travel as `jsonb` so the table layout
/// stays owned by the database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DbConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_max)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&config.url)
            .await
            .map_err(backend_error)?;
        Ok(Self { pool })
    }
}

fn backend_error(err: sqlx::Error) -> StoreError {
    match err.as_database_error() {
        Some(db) => StoreError::Backend(db.message().to_string()),
        None => StoreError::Backend(err.to_string()),
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quoted column list taken from the keys of a JSON object row.
fn column_list(row: &Value) -> StoreResult<String> {
    let object = row
        .as_object()
        .ok_or_else(|| StoreError::Backend("expected a JSON object row".into()))?;
    if object.is_empty() {
        return Err(StoreError::Backend("row has no columns".into()));
    }
    Ok(object
        .keys()
        .map(|k| quote_ident(k))
        .collect::<Vec<_>>()
        .join(", "))
}

fn insert_sql(table: &str, columns: &str) -> String {
    let table = quote_ident(table);
    format!(
        "INSERT INTO {table} AS t ({columns}) \
         SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1) \
         RETURNING to_jsonb(t)"
    )
}

fn update_sql(table: &str, columns: &str) -> String {
    let table = quote_ident(table);
    format!(
        "UPDATE {table} AS t SET ({columns}) = \
         (SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $2)) \
         WHERE t.id = $1 \
         RETURNING to_jsonb(t)"
    )
}

#[async_trait]
impl TableStore for PgStore {
    async fn insert(&self, table: &'static str, row: Value) -> StoreResult<Value> {
        let sql = insert_sql(table, &column_list(&row)?);
        sqlx::query_scalar::<_, Value>(&sql)
            .bind(Json(&row))
            .fetch_one(&self.pool)
            .await
            .map_err(backend_error)
    }

    async fn select_all(&self, table: &'static str) -> StoreResult<Vec<Value>> {
        let sql = format!("SELECT to_jsonb(t) FROM {} AS t", quote_ident(table));
        sqlx::query_scalar::<_, Value>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(backend_error)
    }

    async fn select_by_id(&self, table: &'static str, id: Uuid) -> StoreResult<Value> {
        let sql = format!(
            "SELECT to_jsonb(t) FROM {} AS t WHERE t.id = $1",
            quote_ident(table)
        );
        sqlx::query_scalar::<_, Value>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend_error)?
            .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(&self, table: &'static str, id: Uuid, row: Value) -> StoreResult<Value> {
        let sql = update_sql(table, &column_list(&row)?);
        sqlx::query_scalar::<_, Value>(&sql)
            .bind(id)
            .bind(Json(&row))
            .fetch_optional(&self.pool)
            .await
            .map_err(backend_error)?
            .ok_or(StoreError::NotFound)
    }

    async fn delete_by_id(&self, table: &'static str, id: Uuid) -> StoreResult<()> {
        let sql = format!("DELETE FROM {} AS t WHERE t.id = $1", quote_ident(table));
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
