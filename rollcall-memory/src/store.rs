//! In-memory storage implementation for document stores.
//!
//! Documents are kept as BSON documents in HashMaps guarded by an async-aware read-write lock.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::Document as BsonDocument;

use rollcall_core::{
    backend::{StoreBackend, StoreBackendBuilder, UpdateOutcome},
    error::DocumentStoreResult,
    id::RecordId,
    query::Query,
};

use crate::evaluator::DocumentEvaluator;

type CollectionMap = HashMap<RecordId, BsonDocument>;
type StoreMap = HashMap<String, CollectionMap>;


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so clones share
/// the same underlying data. Identifiers are generated on insert, the same way MongoDB
/// assigns an `_id` when the client does not supply one.
///
/// Queries scan every document in a collection (no indexing). Result order is the map's
/// iteration order and is not guaranteed.
///
/// # Example
///
/// ```ignore
/// use rollcall_memory::InMemoryStore;
/// use rollcall_core::backend::StoreBackend;
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let id = store.insert_document(doc! { "name": "Ann" }, "students").await?;
/// assert!(store.get_document(&id, "students").await?.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder
    }

    /// Number of documents currently held in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, document: BsonDocument, collection: &str) -> DocumentStoreResult<RecordId> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        let mut id = RecordId::generate();
        while collection_map.contains_key(&id) {
            id = RecordId::generate();
        }

        collection_map.insert(id, document);

        Ok(id)
    }

    async fn get_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<Option<BsonDocument>> {
        Ok(
            self.store
                .read()
                .await
                .get(collection)
                .and_then(|collection_map| collection_map.get(id))
                .cloned()
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<BsonDocument>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        Ok(
            collection_map
                .values()
                .filter(|doc| match &query.filter {
                    Some(filter) => DocumentEvaluator::matches(doc, filter),
                    None => true,
                })
                .take(query.limit.unwrap_or(usize::MAX))
                .cloned()
                .collect()
        )
    }

    async fn update_document(&self, id: &RecordId, fields: BsonDocument, collection: &str) -> DocumentStoreResult<UpdateOutcome> {
        let mut store = self.store.write().await;
        let Some(existing) = store
            .get_mut(collection)
            .and_then(|collection_map| collection_map.get_mut(id))
        else {
            return Ok(UpdateOutcome::default());
        };

        let mut updated = existing.clone();
        for (field, value) in fields {
            updated.insert(field, value);
        }

        let modified = updated != *existing;
        if modified {
            *existing = updated;
        }

        Ok(UpdateOutcome { matched: true, modified })
    }

    async fn delete_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<bool> {
        Ok(
            self.store
                .write()
                .await
                .get_mut(collection)
                .and_then(|collection_map| collection_map.remove(id))
                .is_some()
        )
    }

    async fn add_index(&self, _collection: &str, _field: &str, _unique: bool) -> DocumentStoreResult<()> {
        // In-memory store does not support indexing (no-op)
        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance. This always succeeds.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
