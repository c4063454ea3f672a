//! MongoDB backend implementation for rollcall.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait,
//! using MongoDB's own query engine for filtering and its `_id` object ids as record
//! identifiers.
//!
//! # Features
//!
//! - **Persistent storage** - Data is persisted to MongoDB Atlas or self-hosted MongoDB
//! - **Connection pooling** - One driver `Client` is built at startup and shared by every request
//! - **Async/await** - Fully asynchronous API built on MongoDB's async driver
//! - **Indexing** - Support for creating indexes on (nested) fields
//!
//! # Example
//!
//! ```ignore
//! use rollcall_core::backend::StoreBackendBuilder;
//! use rollcall_mongodb::MongoDbStore;
//!
//! let store = MongoDbStore::builder("mongodb://localhost:27017", "school")
//!     .build()
//!     .await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as rollcall_mongodb;

pub mod store;
pub mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
