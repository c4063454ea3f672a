//! A small HTTP service for student records.
//!
//! The crate is layered bottom-up:
//!
//! - [`student`] - The validated `Student` record, its address, and partial updates
//! - [`request`] - Request bodies and their conversion into domain values
//! - [`service`] - Create, list, fetch, update and delete over a document store
//! - [`http`] - actix-web routes, error mapping and request tracing
//! - [`config`], [`telemetry`], [`server`] - Process wiring used by the binary
//!
//! Storage is provided by `rollcall-core` backends: `rollcall-mongodb` in production and
//! `rollcall-memory` for local runs and tests.
//!
//! # Example
//!
//! ```ignore
//! use actix_web::{App, web};
//! use rollcall::{http, service::StudentService};
//! use rollcall_core::store::DocumentStore;
//! use rollcall_memory::InMemoryStore;
//!
//! let service = StudentService::new(DocumentStore::new(InMemoryStore::new()), timeout);
//! let app = App::new()
//!     .app_data(web::Data::new(service))
//!     .wrap(http::RequestTrace)
//!     .configure(http::configure::<InMemoryStore>);
//! ```

pub mod config;
pub mod http;
pub mod request;
pub mod server;
pub mod service;
pub mod student;
pub mod telemetry;

pub use rollcall_core::id::{MalformedId, RecordId};

/// In-memory storage backend.
pub mod memory {
    pub use rollcall_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend.
pub mod mongodb {
    pub use rollcall_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
