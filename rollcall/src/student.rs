//! The student record and its embedded address.
//!
//! A [`Student`] can only be obtained through validation, so every value in memory upholds
//! the record invariants: a non-empty name, a non-negative age, and an address whose city
//! and country are both non-empty. Identity is not part of the value; see [`StudentView`].

use bson::{Bson, Document as BsonDocument, doc};
use rollcall_core::{document::Document, id::RecordId};
use serde::Serialize;
use thiserror::Error;

/// Why a student (or address) could not be built.
///
/// Missing keys and invalid values are kept apart so callers can tell them apart in
/// messages, but both are client-input errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("`{field}` must be {expected}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
    },
}

const NON_EMPTY_STRING: &str = "a non-empty string";
const NON_NEGATIVE_INTEGER: &str = "a non-negative integer";
const MAPPING: &str = "a mapping";

/// Where a student lives. Always embedded in a [`Student`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    city: String,
    country: String,
}

impl Address {
    /// Builds an address, rejecting an empty city or country.
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            city: non_empty("address.city", city.into())?,
            country: non_empty("address.country", country.into())?,
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn to_mapping(&self) -> BsonDocument {
        doc! {
            "city": self.city.as_str(),
            "country": self.country.as_str(),
        }
    }

    pub fn from_mapping(mapping: &BsonDocument) -> Result<Self, ValidationError> {
        Self::new(
            required_str(mapping, "city", "address.city")?,
            required_str(mapping, "country", "address.country")?,
        )
    }

    /// Returns a copy with the given sub-fields replaced.
    pub fn merged(&self, city: Option<&str>, country: Option<&str>) -> Result<Self, ValidationError> {
        Self::new(
            city.unwrap_or(&self.city),
            country.unwrap_or(&self.country),
        )
    }
}

/// A validated student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    name: String,
    age: u32,
    address: Address,
}

impl Student {
    /// Builds a student from already-validated parts.
    ///
    /// # Errors
    ///
    /// Fails if `name` is empty or `age` is negative (or beyond `u32::MAX`).
    pub fn new(name: impl Into<String>, age: i64, address: Address) -> Result<Self, ValidationError> {
        Ok(Self {
            name: non_empty("name", name.into())?,
            age: non_negative("age", age)?,
            address,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

impl Document for Student {
    type Error = ValidationError;

    fn collection_name() -> &'static str {
        "students"
    }

    fn to_mapping(&self) -> BsonDocument {
        doc! {
            "name": self.name.as_str(),
            "age": i64::from(self.age),
            "address": self.address.to_mapping(),
        }
    }

    fn from_mapping(mapping: &BsonDocument) -> Result<Self, ValidationError> {
        let name = required_str(mapping, "name", "name")?;
        let age = required_int(mapping, "age", "age")?;
        let address = match mapping.get("address") {
            None => return Err(ValidationError::MissingField("address")),
            Some(Bson::Document(address)) => Address::from_mapping(address)?,
            Some(_) => {
                return Err(ValidationError::InvalidValue { field: "address", expected: MAPPING });
            }
        };

        Self::new(name, age, address)
    }
}

/// A stored student together with its identifier, as returned by fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentView {
    pub id: RecordId,
    #[serde(flatten)]
    pub student: Student,
}

/// The projection returned by list: address is deliberately left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSummary {
    pub name: String,
    pub age: u32,
}

impl From<Student> for StudentSummary {
    fn from(student: Student) -> Self {
        Self { name: student.name, age: student.age }
    }
}

/// A validated partial update.
///
/// Every field is optional. `address` is itself partial: only the provided sub-fields
/// replace the stored ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub address: Option<AddressPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressPatch {
    pub city: Option<String>,
    pub country: Option<String>,
}

impl StudentPatch {
    /// Validates each provided value on its own. Absent fields are not checked.
    pub fn new(
        name: Option<String>,
        age: Option<i64>,
        address: Option<AddressPatch>,
    ) -> Result<Self, ValidationError> {
        let address = address
            .map(|patch| -> Result<AddressPatch, ValidationError> {
                Ok(AddressPatch {
                    city: patch.city.map(|city| non_empty("address.city", city)).transpose()?,
                    country: patch.country.map(|country| non_empty("address.country", country)).transpose()?,
                })
            })
            .transpose()?;

        Ok(Self {
            name: name.map(|name| non_empty("name", name)).transpose()?,
            age: age.map(|age| non_negative("age", age)).transpose()?,
            address,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.address.is_none()
    }

    /// Builds the top-level fields to overwrite on `current`.
    ///
    /// The address, when present in the patch, is merged into the stored address and
    /// written back whole, so untouched sub-fields keep their stored values.
    pub fn set_fields(&self, current: &Student) -> Result<BsonDocument, ValidationError> {
        let mut fields = BsonDocument::new();

        if let Some(name) = &self.name {
            fields.insert("name", name.as_str());
        }
        if let Some(age) = self.age {
            fields.insert("age", i64::from(age));
        }
        if let Some(address) = &self.address {
            let merged = current
                .address
                .merged(address.city.as_deref(), address.country.as_deref())?;
            fields.insert("address", merged.to_mapping());
        }

        Ok(fields)
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::InvalidValue { field, expected: NON_EMPTY_STRING });
    }

    Ok(value)
}

fn non_negative(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    u32::try_from(value)
        .map_err(|_| ValidationError::InvalidValue { field, expected: NON_NEGATIVE_INTEGER })
}

fn required_str<'a>(
    mapping: &'a BsonDocument,
    key: &str,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match mapping.get(key) {
        None => Err(ValidationError::MissingField(field)),
        Some(Bson::String(value)) => Ok(value.as_str()),
        Some(_) => Err(ValidationError::InvalidValue { field, expected: NON_EMPTY_STRING }),
    }
}

fn required_int(mapping: &BsonDocument, key: &str, field: &'static str) -> Result<i64, ValidationError> {
    match mapping.get(key) {
        None => Err(ValidationError::MissingField(field)),
        Some(Bson::Int32(value)) => Ok(i64::from(*value)),
        Some(Bson::Int64(value)) => Ok(*value),
        Some(_) => Err(ValidationError::InvalidValue { field, expected: NON_NEGATIVE_INTEGER }),
    }
}
