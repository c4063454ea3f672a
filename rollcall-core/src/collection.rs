//! Typed access to a single collection.
//!
//! A [`Collection`] binds a collection name to a backend and a [`Document`] type, so callers
//! work with domain values while the backend sees BSON mappings.
//!
//! # Example
//!
//! ```ignore
//! let students = store.collection::<Student>();
//! let id = students.insert(&student).await?;
//! let found: Option<Student> = students.get(&id).await?;
//! ```

use bson::Document as BsonDocument;
use std::marker::PhantomData;

use crate::{
    backend::{StoreBackend, UpdateOutcome},
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
    id::RecordId,
    query::Query,
};

#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> Collection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a document and returns the identifier the backend assigned to it.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if the backend rejects the insert.
    pub async fn insert(&self, document: &D) -> DocumentStoreResult<RecordId> {
        self.backend
            .insert_document(document.to_mapping(), self.name())
            .await
    }

    /// Retrieves the document with the given id, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`] if the stored mapping no longer decodes.
    pub async fn get(&self, id: &RecordId) -> DocumentStoreResult<Option<D>> {
        self.backend
            .get_document(id, self.name())
            .await?
            .map(|mapping| decode::<D>(&mapping))
            .transpose()
    }

    /// Runs a query and decodes every matching document.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if the query fails or a result does not decode.
    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .query_documents(query, self.name())
            .await?
            .iter()
            .map(decode::<D>)
            .collect()
    }

    /// Overwrites the given top-level fields on the document with the given id.
    pub async fn update(
        &self,
        id: &RecordId,
        fields: BsonDocument,
    ) -> DocumentStoreResult<UpdateOutcome> {
        self.backend
            .update_document(id, fields, self.name())
            .await
    }

    /// Deletes the document with the given id. Returns `true` if one was removed.
    pub async fn delete(&self, id: &RecordId) -> DocumentStoreResult<bool> {
        self.backend
            .delete_document(id, self.name())
            .await
    }

    /// Creates an ascending index on `field`.
    pub async fn add_index(&self, field: &str, unique: bool) -> DocumentStoreResult<()> {
        self.backend
            .add_index(self.name(), field, unique)
            .await
    }
}

fn decode<D: Document>(mapping: &BsonDocument) -> DocumentStoreResult<D> {
    D::from_mapping(mapping)
        .map_err(|err| DocumentStoreError::InvalidDocument(err.to_string()))
}
