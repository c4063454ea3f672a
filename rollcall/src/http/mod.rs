//! The HTTP surface of the service, built on actix-web.
//!
//! [`configure`] registers the routes and extractor configuration on any actix `App`, so the
//! binary and the tests assemble the same application.

pub mod error;
pub mod students;
pub mod trace;

use actix_web::{HttpRequest, HttpResponse, web};
use rollcall_core::backend::StoreBackend;
use serde_json::json;

pub use self::{
    error::{ApiError, ApiResult, ErrorBody},
    trace::{REQUEST_ID_HEADER, RequestTrace},
};

/// Registers the student routes, the health probe, and the extractor error handlers.
///
/// The caller provides the [`StudentService`](crate::service::StudentService) as `web::Data`.
pub fn configure<B: StoreBackend + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/health", web::get().to(health))
        .service(
            web::resource("/students")
                .route(web::post().to(students::create_student::<B>))
                .route(web::get().to(students::list_students::<B>)),
        )
        .service(
            web::resource("/students/{id}")
                .route(web::get().to(students::fetch_student::<B>))
                .route(web::patch().to(students::update_student::<B>))
                .route(web::delete().to(students::delete_student::<B>)),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        ApiError::bad_request(err.to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        ApiError::bad_request(err.to_string()).into()
    })
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
