//! Persistence layer: the record store gateway.
//!
//! [`RecordStore`] performs create/read/update/delete against the three
//! record collections. Two backends exist: a volatile in-memory store and
//! a PostgreSQL store keeping every document in one JSONB table.

pub mod memory;
pub mod models;
pub mod postgres;

use serde_json::{Map, Value};

pub use memory::MemoryStore;
pub use models::{Direction, Document, Filter, Sort};
pub use postgres::PostgresStore;

use crate::domain::{Collection, RecordId};
use crate::error::GatewayError;

/// Document store used by the record service.
#[derive(Debug, Clone)]
pub enum RecordStore {
    /// In-process store; contents are lost on restart.
    Memory(MemoryStore),
    /// PostgreSQL JSONB store.
    Postgres(PostgresStore),
}

impl RecordStore {
    /// Returns a short backend name for logs.
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }

    /// Stores `body` and returns the store-generated identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on backend failure.
    pub async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
    ) -> Result<RecordId, GatewayError> {
        match self {
            Self::Memory(store) => Ok(store.insert(collection, body).await),
            Self::Postgres(store) => store.insert(collection, body).await,
        }
    }

    /// Returns the documents matching `filter`, ordered by `sort` (insertion
    /// order when absent) and truncated to `limit`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on backend failure.
    pub async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<&Sort>,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, GatewayError> {
        match self {
            Self::Memory(store) => Ok(store.find(collection, filter, sort, limit).await),
            Self::Postgres(store) => store.find(collection, filter, sort, limit).await,
        }
    }

    /// Returns the document with the given identifier, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on backend failure.
    pub async fn find_one(
        &self,
        collection: Collection,
        id: RecordId,
    ) -> Result<Option<Document>, GatewayError> {
        match self {
            Self::Memory(store) => Ok(store.find_one(collection, id).await),
            Self::Postgres(store) => store.find_one(collection, id).await,
        }
    }

    /// Sets the top-level fields of `patch` on the document. Returns the
    /// matched count.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on backend failure.
    pub async fn update(
        &self,
        collection: Collection,
        id: RecordId,
        patch: Map<String, Value>,
    ) -> Result<u64, GatewayError> {
        match self {
            Self::Memory(store) => Ok(store.update(collection, id, patch).await),
            Self::Postgres(store) => store.update(collection, id, patch).await,
        }
    }

    /// Deletes the document. Returns the deleted count.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on backend failure.
    pub async fn delete(&self, collection: Collection, id: RecordId) -> Result<u64, GatewayError> {
        match self {
            Self::Memory(store) => Ok(store.delete(collection, id).await),
            Self::Postgres(store) => store.delete(collection, id).await,
        }
    }
}

impl From<MemoryStore> for RecordStore {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl From<PostgresStore> for RecordStore {
    fn from(store: PostgresStore) -> Self {
        Self::Postgres(store)
    }
}
