use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, Bson, doc};
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    options::{ClientOptions, FindOptions, IndexOptions},
};
use rollcall_core::{
    backend::{StoreBackend, StoreBackendBuilder, UpdateOutcome},
    error::{DocumentStoreError, DocumentStoreResult},
    id::RecordId,
    query::{Query, QueryVisitor},
};

use crate::query::MongoQueryTranslator;


/// MongoDB-backed document store.
///
/// Holds one pooled [`Client`]; clones share the pool. Identifiers are the `_id`
/// object ids MongoDB assigns on insert.
#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    fn restore_document(mut document: Document) -> Document {
        document.remove("_id");
        document
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

fn by_id(id: &RecordId) -> Document {
    doc! { "_id": Bson::from(*id) }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, document: Document, collection: &str) -> DocumentStoreResult<RecordId> {
        let result = self.get_collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        result.inserted_id
            .as_object_id()
            .map(RecordId::from)
            .ok_or_else(|| DocumentStoreError::Backend(format!("Inserted id is not an object id: {}", result.inserted_id)))
    }

    async fn get_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<Option<Document>> {
        Ok(
            self.get_collection(collection)
                .find_one(by_id(id))
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .map(Self::restore_document)
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        Ok(
            self.get_collection(collection)
                .find(
                    if let Some(expr) = &query.filter {
                        MongoQueryTranslator.visit_expr(expr)?
                    } else {
                        doc! {}
                    },
                )
                .with_options(options)
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .into_iter()
                .map(Self::restore_document)
                .collect()
        )
    }

    async fn update_document(&self, id: &RecordId, fields: Document, collection: &str) -> DocumentStoreResult<UpdateOutcome> {
        let result = self.get_collection(collection)
            .update_one(by_id(id), doc! { "$set": fields })
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(UpdateOutcome {
            matched: result.matched_count > 0,
            modified: result.modified_count > 0,
        })
    }

    async fn delete_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<bool> {
        let result = self.get_collection(collection)
            .delete_one(by_id(id))
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }

    async fn add_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .create_index(
                IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                    .unique(unique)
                    .build()
                )
                .build()
            )
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
    app_name: Option<String>,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            app_name: None,
        }
    }

    /// Name reported to the server in connection handshakes and logs.
    pub fn app_name(mut self, app_name: &str) -> Self {
        self.app_name = Some(app_name.to_string());
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        if self.app_name.is_some() {
            options.app_name = self.app_name;
        }

        Ok(MongoDbStore::new(
            Client::with_options(options)
                .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
