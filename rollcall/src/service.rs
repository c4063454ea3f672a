//! Student operations over a document store.
//!
//! [`StudentService`] is transport-agnostic: it takes typed requests and raw identifier
//! strings, and reports failures as [`StudentError`]. Every storage call is bounded by the
//! configured timeout.

use std::{future::Future, time::Duration};

use rollcall_core::{
    backend::StoreBackend,
    error::{DocumentStoreError, DocumentStoreResult},
    id::{MalformedId, RecordId},
    query::{Filter, Query},
    store::DocumentStore,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    request::{StudentCreateRequest, StudentUpdateRequest},
    student::{Student, StudentPatch, StudentSummary, StudentView, ValidationError},
};

/// Upper bound on the number of records a single list call returns.
pub const STUDENT_LIST_LIMIT: usize = 1000;

/// Fields indexed at startup to serve the list filters.
const INDEXED_FIELDS: [&str; 2] = ["address.country", "age"];

#[derive(Error, Debug)]
pub enum StudentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    MalformedId(#[from] MalformedId),
    #[error("Student not found")]
    NotFound,
    #[error("storage did not respond within {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Store(#[from] DocumentStoreError),
}

pub type StudentResult<T> = Result<T, StudentError>;

/// Optional list filters. When both are set a record must satisfy both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Exact match on `address.country`.
    pub country: Option<String>,
    /// Inclusive lower bound on `age`.
    pub min_age: Option<i64>,
}

impl StudentFilter {
    fn into_query(self) -> Query {
        let clauses: Vec<_> = [
            self.country.map(|country| Filter::eq("address.country", country)),
            self.min_age.map(|age| Filter::gte("age", age)),
        ]
        .into_iter()
        .flatten()
        .collect();

        let filter = match clauses.len() {
            0 => None,
            1 => clauses.into_iter().next(),
            _ => Some(Filter::and(clauses)),
        };

        Query::builder()
            .maybe_filter(filter)
            .limit(STUDENT_LIST_LIMIT)
            .build()
    }
}

/// Create, list, fetch, update and delete students.
///
/// Cloning is cheap when the backend is: the backends shipped with rollcall share
/// their connection pool (or map) between clones.
#[derive(Debug, Clone)]
pub struct StudentService<B: StoreBackend> {
    store: DocumentStore<B>,
    timeout: Duration,
}

impl<B: StoreBackend> StudentService<B> {
    pub fn new(store: DocumentStore<B>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn store(&self) -> &DocumentStore<B> {
        &self.store
    }

    /// Creates the secondary indexes used by [`StudentService::list`].
    pub async fn ensure_indexes(&self) -> StudentResult<()> {
        let students = self.store.collection::<Student>();
        for field in INDEXED_FIELDS {
            self.bounded("add_index", students.add_index(field, false)).await?;
            debug!(collection = students.name(), field, "index ensured");
        }

        Ok(())
    }

    /// Validates and persists a new student, returning its generated identifier.
    pub async fn create(&self, request: StudentCreateRequest) -> StudentResult<RecordId> {
        let student = Student::try_from(request)?;
        let id = self
            .bounded("insert", self.store.collection::<Student>().insert(&student))
            .await?;

        info!(%id, "student created");
        Ok(id)
    }

    /// Lists up to [`STUDENT_LIST_LIMIT`] students matching `filter`, as name and age only.
    pub async fn list(&self, filter: StudentFilter) -> StudentResult<Vec<StudentSummary>> {
        debug!(?filter, "listing students");
        let students = self
            .bounded("query", self.store.collection::<Student>().query(filter.into_query()))
            .await?;

        Ok(students.into_iter().map(StudentSummary::from).collect())
    }

    /// Loads one student by its identifier.
    pub async fn fetch(&self, id: &str) -> StudentResult<StudentView> {
        let id = RecordId::parse(id)?;
        let student = self.load(&id).await?;

        Ok(StudentView { id, student })
    }

    /// Applies a partial update.
    ///
    /// Provided top-level fields replace the stored ones; a provided `address` is merged
    /// sub-field by sub-field. An update that leaves the stored record unchanged is reported
    /// as [`StudentError::NotFound`], the same as an unknown id.
    pub async fn update(&self, id: &str, request: StudentUpdateRequest) -> StudentResult<()> {
        let id = RecordId::parse(id)?;
        let patch = StudentPatch::try_from(request)?;
        let current = self.load(&id).await?;

        let fields = patch.set_fields(&current)?;
        if fields.is_empty() {
            debug!(%id, "empty update");
            return Err(StudentError::NotFound);
        }

        let outcome = self
            .bounded("update", self.store.collection::<Student>().update(&id, fields))
            .await?;
        if !outcome.modified {
            debug!(%id, matched = outcome.matched, "update modified nothing");
            return Err(StudentError::NotFound);
        }

        info!(%id, "student updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> StudentResult<()> {
        let id = RecordId::parse(id)?;
        let deleted = self
            .bounded("delete", self.store.collection::<Student>().delete(&id))
            .await?;
        if !deleted {
            return Err(StudentError::NotFound);
        }

        info!(%id, "student deleted");
        Ok(())
    }

    async fn load(&self, id: &RecordId) -> StudentResult<Student> {
        self.bounded("get", self.store.collection::<Student>().get(id))
            .await?
            .ok_or(StudentError::NotFound)
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> StudentResult<T>
    where
        F: Future<Output = DocumentStoreResult<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!(operation, timeout = ?self.timeout, "storage call timed out");
                Err(StudentError::Timeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{AddressRequest, AddressUpdateRequest};
    use async_trait::async_trait;
    use bson::Document as BsonDocument;
    use rollcall_core::backend::UpdateOutcome;
    use rollcall_memory::InMemoryStore;
    use rstest::rstest;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn service() -> StudentService<InMemoryStore> {
        StudentService::new(DocumentStore::new(InMemoryStore::new()), TIMEOUT)
    }

    fn create_request(name: &str, age: i64, city: &str, country: &str) -> StudentCreateRequest {
        StudentCreateRequest {
            name: name.into(),
            age,
            address: AddressRequest { city: city.into(), country: country.into() },
        }
    }

    async fn seeded() -> (StudentService<InMemoryStore>, RecordId, RecordId, RecordId) {
        let service = service();
        let a = service.create(create_request("A", 20, "Pune", "IN")).await.unwrap();
        let b = service.create(create_request("B", 25, "Delhi", "IN")).await.unwrap();
        let c = service.create(create_request("C", 25, "Austin", "US")).await.unwrap();

        (service, a, b, c)
    }

    fn names(mut summaries: Vec<StudentSummary>) -> Vec<String> {
        summaries.sort_by(|left, right| left.name.cmp(&right.name));
        summaries.into_iter().map(|summary| summary.name).collect()
    }

    #[tokio::test]
    async fn create_then_fetch_returns_the_same_values() {
        let service = service();
        let id = service.create(create_request("Ann", 20, "Pune", "IN")).await.unwrap();

        let view = service.fetch(&id.to_string()).await.unwrap();

        assert_eq!(view.id, id);
        assert_eq!(view.student.name(), "Ann");
        assert_eq!(view.student.age(), 20);
        assert_eq!(view.student.address().city(), "Pune");
    }

    #[tokio::test]
    async fn create_rejects_invalid_values_without_writing() {
        let service = service();

        let err = service.create(create_request("", 20, "Pune", "IN")).await.unwrap_err();

        assert!(matches!(err, StudentError::Validation(_)));
        assert_eq!(service.store().backend().count("students").await, 0);
    }

    #[rstest]
    #[case(StudentFilter::default(), vec!["A", "B", "C"])]
    #[case(StudentFilter { country: Some("IN".into()), min_age: None }, vec!["A", "B"])]
    #[case(StudentFilter { country: None, min_age: Some(25) }, vec!["B", "C"])]
    #[case(StudentFilter { country: Some("IN".into()), min_age: Some(22) }, vec!["B"])]
    #[case(StudentFilter { country: Some("in".into()), min_age: None }, vec![])]
    #[case(StudentFilter { country: None, min_age: Some(26) }, vec![])]
    #[tokio::test]
    async fn list_applies_filters_conjunctively(
        #[case] filter: StudentFilter,
        #[case] expected: Vec<&str>,
    ) {
        let (service, ..) = seeded().await;

        let listed = service.list(filter).await.unwrap();

        assert_eq!(names(listed), expected);
    }

    #[tokio::test]
    async fn list_is_capped() {
        let service = service();
        for index in 0..STUDENT_LIST_LIMIT + 5 {
            service
                .create(create_request(&format!("S{index}"), 20, "Pune", "IN"))
                .await
                .unwrap();
        }

        let listed = service.list(StudentFilter::default()).await.unwrap();

        assert_eq!(listed.len(), STUDENT_LIST_LIMIT);
    }

    #[tokio::test]
    async fn update_merges_address_and_keeps_other_fields() {
        let (service, a, ..) = seeded().await;
        let request = StudentUpdateRequest {
            address: Some(AddressUpdateRequest { city: Some("Mumbai".into()), country: None }),
            ..Default::default()
        };

        service.update(&a.to_string(), request).await.unwrap();

        let view = service.fetch(&a.to_string()).await.unwrap();
        assert_eq!(view.student.name(), "A");
        assert_eq!(view.student.age(), 20);
        assert_eq!(view.student.address().city(), "Mumbai");
        assert_eq!(view.student.address().country(), "IN");
    }

    #[tokio::test]
    async fn update_with_identical_values_reports_not_found() {
        let (service, a, ..) = seeded().await;
        let request = StudentUpdateRequest { age: Some(20), ..Default::default() };

        let err = service.update(&a.to_string(), request).await.unwrap_err();

        assert!(matches!(err, StudentError::NotFound));
    }

    #[tokio::test]
    async fn empty_update_reports_not_found() {
        let (service, a, ..) = seeded().await;

        let err = service
            .update(&a.to_string(), StudentUpdateRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, StudentError::NotFound));
    }

    #[tokio::test]
    async fn update_rejects_invalid_values_before_loading() {
        let service = service();
        let unknown = RecordId::generate().to_string();
        let request = StudentUpdateRequest { name: Some(String::new()), ..Default::default() };

        let err = service.update(&unknown, request).await.unwrap_err();

        assert!(matches!(err, StudentError::Validation(_)));
    }

    #[tokio::test]
    async fn operations_on_unknown_ids_report_not_found() {
        let (service, ..) = seeded().await;
        let unknown = RecordId::generate().to_string();
        let request = StudentUpdateRequest { age: Some(30), ..Default::default() };

        assert!(matches!(service.fetch(&unknown).await, Err(StudentError::NotFound)));
        assert!(matches!(service.update(&unknown, request).await, Err(StudentError::NotFound)));
        assert!(matches!(service.delete(&unknown).await, Err(StudentError::NotFound)));
    }

    #[rstest]
    #[case("")]
    #[case("not-an-id")]
    #[case("65f1c0ffee0ddba11deadbe")]
    #[tokio::test]
    async fn malformed_ids_are_rejected(#[case] id: &str) {
        let service = service();

        let request = StudentUpdateRequest { age: Some(21), ..Default::default() };

        assert!(matches!(service.fetch(id).await, Err(StudentError::MalformedId(_))));
        assert!(matches!(service.update(id, request).await, Err(StudentError::MalformedId(_))));
        assert!(matches!(service.delete(id).await, Err(StudentError::MalformedId(_))));
    }

    #[tokio::test]
    async fn delete_removes_the_record_once() {
        let (service, a, ..) = seeded().await;

        service.delete(&a.to_string()).await.unwrap();

        assert!(matches!(service.fetch(&a.to_string()).await, Err(StudentError::NotFound)));
        assert!(matches!(service.delete(&a.to_string()).await, Err(StudentError::NotFound)));
        assert_eq!(names(service.list(StudentFilter::default()).await.unwrap()), vec!["B", "C"]);
    }

    /// Delegates to an in-memory store after an artificial delay.
    #[derive(Debug, Default)]
    struct SlowStore {
        inner: InMemoryStore,
        delay: Duration,
    }

    impl SlowStore {
        async fn pause(&self) {
            tokio::time::sleep(self.delay).await;
        }
    }

    #[async_trait]
    impl StoreBackend for SlowStore {
        async fn insert_document(&self, document: BsonDocument, collection: &str) -> DocumentStoreResult<RecordId> {
            self.pause().await;
            self.inner.insert_document(document, collection).await
        }

        async fn get_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<Option<BsonDocument>> {
            self.pause().await;
            self.inner.get_document(id, collection).await
        }

        async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<BsonDocument>> {
            self.pause().await;
            self.inner.query_documents(query, collection).await
        }

        async fn update_document(
            &self,
            id: &RecordId,
            fields: BsonDocument,
            collection: &str,
        ) -> DocumentStoreResult<UpdateOutcome> {
            self.pause().await;
            self.inner.update_document(id, fields, collection).await
        }

        async fn delete_document(&self, id: &RecordId, collection: &str) -> DocumentStoreResult<bool> {
            self.pause().await;
            self.inner.delete_document(id, collection).await
        }

        async fn add_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()> {
            self.inner.add_index(collection, field, unique).await
        }
    }

    #[tokio::test]
    async fn slow_storage_surfaces_a_timeout() {
        let store = SlowStore { inner: InMemoryStore::new(), delay: Duration::from_secs(2) };
        let service = StudentService::new(DocumentStore::new(store), Duration::from_millis(20));

        let err = service.list(StudentFilter::default()).await.unwrap_err();

        assert!(matches!(err, StudentError::Timeout(_)));
    }
}
