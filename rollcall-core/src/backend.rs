//! Storage backend abstraction for the document store.
//!
//! This module defines the core traits that abstract over storage implementations,
//! allowing the service to run against an in-memory store during development and tests and
//! against MongoDB in production.
//!
//! # Overview
//!
//! The [`StoreBackend`] trait provides a unified async interface for the single-document
//! operations the service needs: insert with a generated id, lookup by id, filtered queries,
//! partial updates, and deletion. Implementations are required to be thread-safe
//! (`Send + Sync`) and support concurrent access.
//!
//! # Examples
//!
//! ```ignore
//! use rollcall_core::backend::StoreBackend;
//! use bson::doc;
//!
//! let id = backend.insert_document(doc! { "name": "Ann", "age": 20 }, "students").await?;
//! let found = backend.get_document(&id, "students").await?;
//! assert!(found.is_some());
//! ```

use async_trait::async_trait;
use bson::Document as BsonDocument;
use std::fmt::Debug;

use crate::{error::DocumentStoreResult, id::RecordId, query::Query};

/// Result of an update against a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// Whether a document with the given id existed.
    pub matched: bool,
    /// Whether the stored document changed as a result of the update.
    pub modified: bool,
}

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// async tasks. The concurrency model is implementation-specific.
///
/// # Identity
///
/// Documents passed to and returned from a backend never carry their identifier as a field.
/// The backend assigns a [`RecordId`] on insert and keeps it alongside the document.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a new document into a collection and returns its generated identifier.
    ///
    /// The collection is created on first use.
    async fn insert_document(
        &self,
        document: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<RecordId>;

    /// Retrieves a single document by id, or `None` if it does not exist.
    async fn get_document(
        &self,
        id: &RecordId,
        collection: &str,
    ) -> DocumentStoreResult<Option<BsonDocument>>;

    /// Returns the documents matching `query`, in storage order, up to its limit.
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<BsonDocument>>;

    /// Overwrites the top-level fields in `fields` on the document with the given id.
    ///
    /// Fields not present in `fields` keep their stored values. The returned
    /// [`UpdateOutcome`] reports whether the document existed and whether it changed.
    async fn update_document(
        &self,
        id: &RecordId,
        fields: BsonDocument,
        collection: &str,
    ) -> DocumentStoreResult<UpdateOutcome>;

    /// Deletes the document with the given id. Returns `true` if a document was removed.
    async fn delete_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<bool>;

    /// Creates an ascending index on a (possibly dotted) field.
    ///
    /// Backends without indexing treat this as a no-op. Creating an index that already
    /// exists succeeds.
    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        unique: bool,
    ) -> DocumentStoreResult<()>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op. Backends holding external connections
    /// should override this.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Factory for backends that need asynchronous setup, such as opening a connection pool.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
