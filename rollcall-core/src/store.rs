//! Main document store interface.
//!
//! [`DocumentStore`] owns a backend and hands out typed [`Collection`]s that borrow it.
//!
//! ```ignore
//! use rollcall_core::store::DocumentStore;
//!
//! let store = DocumentStore::new(backend);
//! let students = store.collection::<Student>();
//! ```

use crate::{
    backend::StoreBackend,
    collection::Collection,
    document::Document,
    error::DocumentStoreResult,
};

/// A document store bound to a specific backend implementation.
#[derive(Debug, Clone)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's `collection_name()` method.
    pub fn collection<D: Document>(&self) -> Collection<'_, B, D> {
        Collection::new(D::collection_name().to_string(), &self.backend)
    }

    /// Returns a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Shuts down the store and its backend.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await
    }
}
