//! In-memory document storage backend for rollcall.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and backs local development
//! (`--backend memory`) and the service's tests.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Generated identifiers** - Ids are assigned on insert, as MongoDB does
//! - **Query support** - Dotted-path filters and result limits
//!
//! # Quick Start
//!
//! ```ignore
//! use rollcall_core::{backend::StoreBackendBuilder, store::DocumentStore};
//! use rollcall_memory::InMemoryStore;
//!
//! let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//! let students = store.collection::<Student>();
//! let id = students.insert(&student).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as rollcall_memory;

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
