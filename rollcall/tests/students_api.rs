//! End-to-end tests of the student API against the in-memory backend.

use std::time::Duration;

use actix_http::Request;
use actix_web::{
    App,
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, web,
};
use rollcall::{
    RecordId,
    http::{self, ErrorBody, REQUEST_ID_HEADER, RequestTrace},
    memory::InMemoryStore,
    service::StudentService,
};
use rollcall_core::store::DocumentStore;
use rstest::rstest;
use serde_json::{Value, json};

async fn app() -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let service = StudentService::new(DocumentStore::new(InMemoryStore::new()), Duration::from_secs(5));

    test::init_service(
        App::new()
            .app_data(web::Data::new(service))
            .wrap(RequestTrace)
            .configure(http::configure::<InMemoryStore>),
    )
    .await
}

fn student(name: &str, age: i64, city: &str, country: &str) -> Value {
    json!({ "name": name, "age": age, "address": { "city": city, "country": country } })
}

async fn create<S>(app: &S, body: Value) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post().uri("/students").set_json(body).to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(res).await;
    body["id"].as_str().expect("id is a string").to_owned()
}

async fn list_names<S>(app: &S, query: &str) -> Vec<String>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::get().uri(&format!("/students{query}")).to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    let mut names: Vec<String> = body["data"]
        .as_array()
        .expect("data is an array")
        .iter()
        .map(|entry| {
            assert!(entry.get("address").is_none(), "list omits address");
            entry["name"].as_str().expect("name").to_owned()
        })
        .collect();
    names.sort();
    names
}

#[actix_web::test]
async fn create_fetch_update_delete_lifecycle() {
    let app = app().await;
    let id = create(&app, student("Ann", 20, "Pune", "IN")).await;
    assert!(RecordId::parse(&id).is_ok());

    let res = test::call_service(&app, test::TestRequest::get().uri(&format!("/students/{id}")).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(res).await;
    assert_eq!(
        fetched,
        json!({ "id": id, "name": "Ann", "age": 20, "address": { "city": "Pune", "country": "IN" } })
    );

    let req = test::TestRequest::patch()
        .uri(&format!("/students/{id}"))
        .set_json(json!({ "address": { "city": "Mumbai" } }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(res).await.is_empty());

    let res = test::call_service(&app, test::TestRequest::get().uri(&format!("/students/{id}")).to_request()).await;
    let fetched: Value = test::read_body_json(res).await;
    assert_eq!(fetched["address"], json!({ "city": "Mumbai", "country": "IN" }));
    assert_eq!(fetched["name"], "Ann");

    let res = test::call_service(&app, test::TestRequest::delete().uri(&format!("/students/{id}")).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({}));

    let res = test::call_service(&app, test::TestRequest::get().uri(&format!("/students/{id}")).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = test::read_body_json(res).await;
    assert_eq!(body.detail, "Student not found");
}

#[actix_web::test]
async fn list_filters_by_country_and_minimum_age() {
    let app = app().await;
    create(&app, student("A", 20, "Pune", "IN")).await;
    create(&app, student("B", 25, "Delhi", "IN")).await;
    create(&app, student("C", 25, "Austin", "US")).await;

    assert_eq!(list_names(&app, "").await, vec!["A", "B", "C"]);
    assert_eq!(list_names(&app, "?country=IN").await, vec!["A", "B"]);
    assert_eq!(list_names(&app, "?age=25").await, vec!["B", "C"]);
    assert_eq!(list_names(&app, "?country=IN&age=22").await, vec!["B"]);
    assert!(list_names(&app, "?country=FR").await.is_empty());
}

#[rstest]
#[case(json!({ "age": 20, "address": { "city": "Pune", "country": "IN" } }))]
#[case(json!({ "name": "Ann", "age": -1, "address": { "city": "Pune", "country": "IN" } }))]
#[case(json!({ "name": "Ann", "age": "twenty", "address": { "city": "Pune", "country": "IN" } }))]
#[case(json!({ "name": "", "age": 20, "address": { "city": "Pune", "country": "IN" } }))]
#[case(json!({ "name": "Ann", "age": 20, "address": { "city": "", "country": "IN" } }))]
#[case(json!({ "name": "Ann", "age": 20, "address": "Pune" }))]
#[actix_web::test]
async fn create_rejects_invalid_bodies(#[case] body: Value) {
    let app = app().await;

    let req = test::TestRequest::post().uri("/students").set_json(body).to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(res).await;
    assert!(!body.detail.is_empty());
    assert!(list_names(&app, "").await.is_empty());
}

#[rstest]
#[case(json!({ "nickname": "x" }))]
#[case(json!({ "name": "Bob", "nickname": "x" }))]
#[case(json!({ "address": { "zip": "411001" } }))]
#[case(json!({ "age": 30, "address": { "city": "Mumbai", "zip": "400001" } }))]
#[actix_web::test]
async fn update_rejects_unknown_fields_and_keeps_the_record(#[case] body: Value) {
    let app = app().await;
    let id = create(&app, student("Ann", 20, "Pune", "IN")).await;

    let req = test::TestRequest::patch().uri(&format!("/students/{id}")).set_json(body).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: ErrorBody = test::read_body_json(res).await;
    assert!(error.detail.contains("unknown field"), "{}", error.detail);

    let res = test::call_service(&app, test::TestRequest::get().uri(&format!("/students/{id}")).to_request()).await;
    let fetched: Value = test::read_body_json(res).await;
    assert_eq!(
        fetched,
        json!({ "id": id, "name": "Ann", "age": 20, "address": { "city": "Pune", "country": "IN" } })
    );
}

#[rstest]
#[case(test::TestRequest::get())]
#[case(test::TestRequest::delete())]
#[case(test::TestRequest::patch().set_json(json!({ "age": 21 })))]
#[actix_web::test]
async fn malformed_ids_are_client_errors(#[case] request: test::TestRequest) {
    let app = app().await;

    let res = test::call_service(&app, request.uri("/students/not-an-id").to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: ErrorBody = test::read_body_json(res).await;
    assert!(error.detail.starts_with("Malformed identifier"), "{}", error.detail);
}

#[actix_web::test]
async fn unknown_ids_are_not_found_everywhere() {
    let app = app().await;
    let unknown = RecordId::generate().to_string();
    let uri = format!("/students/{unknown}");

    for request in [
        test::TestRequest::get().uri(&uri),
        test::TestRequest::delete().uri(&uri),
        test::TestRequest::patch().uri(&uri).set_json(json!({ "age": 30 })),
    ] {
        let res = test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: ErrorBody = test::read_body_json(res).await;
        assert_eq!(body.detail, "Student not found");
    }
}

#[actix_web::test]
async fn non_integer_age_query_is_a_client_error() {
    let app = app().await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/students?age=old").to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(res).await;
    assert!(!body.detail.is_empty());
}

#[actix_web::test]
async fn responses_carry_a_request_id_and_health_is_ok() {
    let app = app().await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(REQUEST_ID_HEADER));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "status": "ok" }));
}
