//! A thin document database layer that gives the rollcall service a single interface over
//! its storage backends.
//!
//! This crate provides:
//!
//! - **Record identifiers** ([`id`]) - Opaque, storage-assigned identifiers with explicit parse/format
//! - **Document trait** ([`document`]) - Conversion between domain values and storage mappings
//! - **Store backend abstraction** ([`backend`]) - The async trait every storage backend implements
//! - **Query and filtering API** ([`query`]) - Backend-neutral filter expressions
//! - **Collections interface** ([`collection`]) - Typed access to one collection of documents
//! - **Document store** ([`store`]) - Owns a backend and hands out typed collections
//! - **Error handling** ([`error`]) - Error and result types shared by every backend
//!
//! # Example
//!
//! ```ignore
//! use rollcall_core::{document::Document, store::DocumentStore};
//!
//! let store = DocumentStore::new(backend);
//! let students = store.collection::<Student>();
//! let id = students.insert(&student).await?;
//! let found = students.get(&id).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as rollcall_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod id;
pub mod query;
pub mod store;
