//! PostgreSQL implementation of the record store.
//!
//! All collections share one JSONB table. Equality filters use JSONB
//! containment (`body @> $filter`), patches use JSONB concatenation
//! (`body || $patch`), which gives the same shallow `$set` semantics as
//! the in-memory store.

use std::time::Duration;

use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::models::{Direction, Document, Filter, Sort};
use crate::config::GatewayConfig;
use crate::domain::{Collection, RecordId};
use crate::error::GatewayError;

const CREATE_DOCUMENTS: &str = "CREATE TABLE IF NOT EXISTS documents (\
     id UUID PRIMARY KEY, \
     collection TEXT NOT NULL, \
     body JSONB NOT NULL, \
     inserted_at TIMESTAMPTZ NOT NULL DEFAULT now())";

const CREATE_COLLECTION_INDEX: &str = "CREATE INDEX IF NOT EXISTS documents_collection_idx \
     ON documents (collection, inserted_at)";

/// PostgreSQL-backed record store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the database settings in `config` and makes sure the
    /// documents table exists.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] if the database is
    /// unreachable or the table cannot be created.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Creates the documents table and its index if missing.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn ensure_schema(&self) -> Result<(), GatewayError> {
        sqlx::query(CREATE_DOCUMENTS).execute(&self.pool).await?;
        sqlx::query(CREATE_COLLECTION_INDEX)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Inserts a document and returns its new identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
    ) -> Result<RecordId, GatewayError> {
        let id = RecordId::generate();
        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(Uuid::from(id))
            .bind(collection.as_str())
            .bind(Value::Object(body))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    /// Loads matching documents.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<&Sort>,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, GatewayError> {
        let sql = find_sql(sort, limit.is_some());
        let mut query = sqlx::query_as::<_, (Uuid, Value)>(&sql)
            .bind(collection.as_str())
            .bind(Value::Object(filter.as_object().clone()));
        if let Some(sort) = sort {
            query = query.bind(sort.field.clone());
        }
        if let Some(limit) = limit {
            query = query.bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(into_document).collect())
    }

    /// Loads one document by identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn find_one(
        &self,
        collection: Collection,
        id: RecordId,
    ) -> Result<Option<Document>, GatewayError> {
        let row = sqlx::query_as::<_, (Uuid, Value)>(
            "SELECT id, body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(into_document))
    }

    /// Merges `patch` into the stored body. Returns the matched row count.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn update(
        &self,
        collection: Collection,
        id: RecordId,
        patch: Map<String, Value>,
    ) -> Result<u64, GatewayError> {
        let result = sqlx::query(
            "UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(Uuid::from(id))
        .bind(Value::Object(patch))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Deletes one document. Returns the deleted row count.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn delete(&self, collection: Collection, id: RecordId) -> Result<u64, GatewayError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Builds the `find` statement. Parameters: `$1` collection, `$2` filter,
/// then the sort field and the limit when present.
fn find_sql(sort: Option<&Sort>, limited: bool) -> String {
    let mut sql = String::from("SELECT id, body FROM documents WHERE collection = $1 AND body @> $2");
    let mut next_param = 3;
    match sort {
        Some(sort) => {
            let direction = match sort.direction {
                Direction::Ascending => "ASC NULLS FIRST",
                Direction::Descending => "DESC NULLS LAST",
            };
            sql.push_str(&format!(
                " ORDER BY body ->> ${next_param} {direction}, inserted_at ASC"
            ));
            next_param += 1;
        }
        None => sql.push_str(" ORDER BY inserted_at ASC"),
    }
    if limited {
        sql.push_str(&format!(" LIMIT ${next_param}"));
    }
    sql
}

fn into_document((id, body): (Uuid, Value)) -> Document {
    let body = match body {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Document {
        id: RecordId::from_uuid(id),
        body,
    }
}
