//! Request bodies accepted by the student endpoints.
//!
//! Shape is checked by deserialization: required fields on create, optional fields and
//! no unknown keys on update. Values are then checked when converting into the domain types.

use serde::{Deserialize, Serialize};

use crate::student::{Address, AddressPatch, Student, StudentPatch, ValidationError};

/// Body of `POST /students`. Every field is required.
///
/// Example JSON:
/// `{"name":"Ann","age":20,"address":{"city":"Pune","country":"IN"}}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StudentCreateRequest {
    pub name: String,
    pub age: i64,
    pub address: AddressRequest,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddressRequest {
    pub city: String,
    pub country: String,
}

impl TryFrom<StudentCreateRequest> for Student {
    type Error = ValidationError;

    fn try_from(value: StudentCreateRequest) -> Result<Self, Self::Error> {
        let address = Address::new(value.address.city, value.address.country)?;
        Student::new(value.name, value.age, address)
    }
}

/// Body of `PATCH /students/{id}`. Every field is optional; unknown keys are rejected,
/// at the top level and inside `address`.
///
/// Example JSON:
/// `{"address":{"city":"Mumbai"}}`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StudentUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressUpdateRequest>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AddressUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl TryFrom<StudentUpdateRequest> for StudentPatch {
    type Error = ValidationError;

    fn try_from(value: StudentUpdateRequest) -> Result<Self, Self::Error> {
        StudentPatch::new(
            value.name,
            value.age,
            value.address.map(|address| AddressPatch {
                city: address.city,
                country: address.country,
            }),
        )
    }
}
