//! The trait that ties a domain type to its stored representation.
//!
//! A [`Document`] knows which collection it lives in and how to convert itself to and from
//! the storage-neutral mapping (a BSON document). Identity is not part of the mapping: the
//! backend assigns and tracks it, and callers layer it on top where a response needs it.

use bson::Document as BsonDocument;
use std::error::Error as StdError;

/// Core trait implemented by every type stored in a document store.
///
/// Conversion is explicit rather than derived so that decoding can report which field
/// was missing or malformed.
///
/// # Example
///
/// ```ignore
/// use rollcall_core::document::Document;
/// use bson::{doc, Document as BsonDocument};
///
/// struct Tag {
///     label: String,
/// }
///
/// impl Document for Tag {
///     type Error = TagError;
///
///     fn collection_name() -> &'static str {
///         "tags"
///     }
///
///     fn to_mapping(&self) -> BsonDocument {
///         doc! { "label": &self.label }
///     }
///
///     fn from_mapping(mapping: &BsonDocument) -> Result<Self, Self::Error> {
///         let label = mapping.get_str("label").map_err(|_| TagError::Label)?;
///         Ok(Tag { label: label.to_string() })
///     }
/// }
/// ```
pub trait Document: Sized + Send + Sync + 'static {
    /// Error returned when a mapping does not describe a valid value.
    type Error: StdError + Send + Sync + 'static;

    /// Returns the name of the collection this document belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "students").
    fn collection_name() -> &'static str;

    /// Converts this value into its storage mapping, without identity.
    fn to_mapping(&self) -> BsonDocument;

    /// Builds a value from a storage mapping.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if a required key is absent or holds an invalid value.
    fn from_mapping(mapping: &BsonDocument) -> Result<Self, Self::Error>;
}
