//! Handlers for the `/students` resource.

use std::{fmt::Display, str::FromStr};

use actix_web::{HttpResponse, web};
use rollcall_core::{backend::StoreBackend, id::RecordId};
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{
    http::error::ApiResult,
    request::{StudentCreateRequest, StudentUpdateRequest},
    service::{StudentFilter, StudentService},
    student::StudentSummary,
};

#[derive(Debug, Serialize)]
pub struct CreatedBody {
    pub id: RecordId,
}

#[derive(Debug, Serialize)]
pub struct StudentListBody {
    pub data: Vec<StudentSummary>,
}

/// Query string of `GET /students`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListStudentsQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub age: Option<i64>,
}

impl From<ListStudentsQuery> for StudentFilter {
    fn from(query: ListStudentsQuery) -> Self {
        Self { country: query.country, min_age: query.age }
    }
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

/// `POST /students`
pub async fn create_student<B: StoreBackend + 'static>(
    service: web::Data<StudentService<B>>,
    body: web::Json<StudentCreateRequest>,
) -> ApiResult<HttpResponse> {
    let id = service.create(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(CreatedBody { id }))
}

/// `GET /students`
pub async fn list_students<B: StoreBackend + 'static>(
    service: web::Data<StudentService<B>>,
    query: web::Query<ListStudentsQuery>,
) -> ApiResult<HttpResponse> {
    let data = service.list(query.into_inner().into()).await?;

    Ok(HttpResponse::Ok().json(StudentListBody { data }))
}

/// `GET /students/{id}`
pub async fn fetch_student<B: StoreBackend + 'static>(
    service: web::Data<StudentService<B>>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let view = service.fetch(&id).await?;

    Ok(HttpResponse::Ok().json(view))
}

/// `PATCH /students/{id}`
pub async fn update_student<B: StoreBackend + 'static>(
    service: web::Data<StudentService<B>>,
    id: web::Path<String>,
    body: web::Json<StudentUpdateRequest>,
) -> ApiResult<HttpResponse> {
    service.update(&id, body.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// `DELETE /students/{id}`
pub async fn delete_student<B: StoreBackend + 'static>(
    service: web::Data<StudentService<B>>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    service.delete(&id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}
