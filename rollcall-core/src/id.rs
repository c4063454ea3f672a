//! Opaque record identifiers.
//!
//! A [`RecordId`] is assigned by the storage backend when a document is inserted. Callers
//! only ever see its string form: 24 lowercase hexadecimal characters. Anything that does
//! not parse is rejected with [`MalformedId`] before it reaches a backend.

use std::{fmt, str::FromStr};

use bson::{Bson, oid::ObjectId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string is not a valid record identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed identifier: {0:?}")]
pub struct MalformedId(pub String);

/// Storage-assigned identifier of a single document.
///
/// # Example
///
/// ```ignore
/// use rollcall_core::id::RecordId;
///
/// let id = RecordId::parse("65f1c0ffee0ddba11deadbee")?;
/// assert_eq!(id.to_string(), "65f1c0ffee0ddba11deadbee");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Generates a fresh identifier. Used by backends that allocate ids themselves.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Parses the string form of an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedId`] if `value` is not exactly 24 hexadecimal characters.
    pub fn parse(value: &str) -> Result<Self, MalformedId> {
        ObjectId::parse_str(value)
            .map(Self)
            .map_err(|_| MalformedId(value.to_string()))
    }

    /// Returns the underlying object id for backends that store it natively.
    pub fn as_object_id(&self) -> &ObjectId {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl FromStr for RecordId {
    type Err = MalformedId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = MalformedId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.to_string()
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl From<RecordId> for Bson {
    fn from(id: RecordId) -> Self {
        Bson::ObjectId(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parse_and_display_round_trip() {
        let id = RecordId::parse("65f1c0ffee0ddba11deadbee").unwrap();
        assert_eq!(id.to_string(), "65f1c0ffee0ddba11deadbee");
    }

    #[test]
    fn generated_ids_are_distinct_and_parseable() {
        let first = RecordId::generate();
        let second = RecordId::generate();

        assert_ne!(first, second);
        assert_eq!(RecordId::parse(&first.to_string()).unwrap(), first);
    }

    #[rstest]
    #[case("")]
    #[case("not-an-id")]
    #[case("65f1c0ffee0ddba11deadbe")]
    #[case("65f1c0ffee0ddba11deadbeef")]
    #[case("zzzzzzzzzzzzzzzzzzzzzzzz")]
    fn rejects_malformed_input(#[case] input: &str) {
        assert_eq!(RecordId::parse(input), Err(MalformedId(input.to_string())));
    }

    #[test]
    fn serializes_as_string() {
        let id = RecordId::parse("65f1c0ffee0ddba11deadbee").unwrap();
        let value = bson::ser::serialize_to_bson(&id).unwrap();

        assert_eq!(value, Bson::String("65f1c0ffee0ddba11deadbee".into()));
    }
}
