//! End-to-end tests for the hierarchy, search, and management chain routes
//! over the fully wired application.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use chrono::Utc;
use rstest::rstest;
use serde_json::Value;

use backend::domain::person::{Person, PersonStatus, PersonType};
use backend::domain::ports::{InMemoryPersonRepository, PersonRepository};
use backend::inbound::http::auth::{API_KEY_HEADER, ApiKeyPolicy};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::server::{build_app, build_directory};

fn person(id: i32, name: &str, job_title: &str, manager_id: Option<i32>) -> Person {
    let now = Utc::now();
    Person {
        id,
        name: name.to_owned(),
        job_title: job_title.to_owned(),
        department: "Engineering".to_owned(),
        manager_id,
        photo_path: None,
        person_type: PersonType::Employee,
        status: PersonStatus::Active,
        email: Some(format!("{}@example.com", name.to_lowercase())),
        phone: None,
        location: None,
        hire_date: None,
        created_at: now,
        updated_at: now,
    }
}

fn seeded_store() -> Arc<dyn PersonRepository> {
    Arc::new(InMemoryPersonRepository::with_people(vec![
        person(1, "Ada", "CEO", None),
        person(2, "Brian", "CTO", Some(1)),
        person(3, "Carol", "Staff Engineer", Some(2)),
        person(4, "Dan", "Engineer", Some(3)),
    ]))
}

async fn spawn_app(
    policy: ApiKeyPolicy,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let directory = build_directory(seeded_store());
    let http_state = web::Data::new(HttpState::new(directory));
    let health_state = web::Data::new(HealthState::new());
    actix_test::init_service(build_app(http_state, health_state, web::Data::new(policy))).await
}

async fn get_json(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    uri: &str,
) -> (StatusCode, Value) {
    let response =
        actix_test::call_service(app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

#[actix_web::test]
async fn hierarchy_returns_the_full_tree() {
    let app = spawn_app(ApiKeyPolicy::disabled()).await;
    let (status, body) = get_json(&app, "/api/v1/hierarchy").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], Value::Bool(true));
    let root = &body["data"];
    assert_eq!(root["name"], "Ada");
    assert_eq!(root["children"][0]["name"], "Brian");
    assert_eq!(root["children"][0]["children"][0]["name"], "Carol");
    assert_eq!(
        root["children"][0]["children"][0]["children"][0]["name"],
        "Dan"
    );
}

#[actix_web::test]
async fn hierarchy_scopes_to_the_requested_root() {
    let app = spawn_app(ApiKeyPolicy::disabled()).await;
    let (status, body) = get_json(&app, "/api/v1/hierarchy?rootId=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Brian");
    assert_eq!(body["data"]["children"][0]["name"], "Carol");
}

#[actix_web::test]
async fn hierarchy_rejects_an_unknown_root() {
    let app = spawn_app(ApiKeyPolicy::disabled()).await;
    let (status, body) = get_json(&app, "/api/v1/hierarchy?rootId=99").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn search_ranks_exact_matches_first() {
    let app = spawn_app(ApiKeyPolicy::disabled()).await;
    let (status, body) = get_json(&app, "/api/v1/hierarchy/search?q=carol").await;

    assert_eq!(status, StatusCode::OK);
    let results = body["data"].as_array().expect("results array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Carol");
    assert_eq!(results[0]["score"], 100);
    assert_eq!(results[0]["matchedFields"][0], "name");
}

#[rstest]
#[case::missing("/api/v1/hierarchy/search")]
#[case::blank("/api/v1/hierarchy/search?q=%20")]
#[actix_web::test]
async fn search_requires_a_query(#[case] uri: &str) {
    let app = spawn_app(ApiKeyPolicy::disabled()).await;
    let (status, body) = get_json(&app, uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn management_chain_lists_managers_nearest_first() {
    let app = spawn_app(ApiKeyPolicy::disabled()).await;
    let (status, body) = get_json(&app, "/api/v1/people/4/management-chain").await;

    assert_eq!(status, StatusCode::OK);
    let chain = body["data"].as_array().expect("chain array");
    let names: Vec<_> = chain
        .iter()
        .map(|entry| entry["name"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["Carol", "Brian", "Ada"]);
}

#[actix_web::test]
async fn management_chain_rejects_an_unknown_person() {
    let app = spawn_app(ApiKeyPolicy::disabled()).await;
    let (status, body) = get_json(&app, "/api/v1/people/99/management-chain").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn directory_routes_enforce_the_api_key() {
    let app = spawn_app(ApiKeyPolicy::required("sesame")).await;

    let (status, body) = get_json(&app, "/api/v1/hierarchy").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/hierarchy")
        .insert_header((API_KEY_HEADER, "sesame"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn health_probes_skip_authentication() {
    let app = spawn_app(ApiKeyPolicy::required("sesame")).await;
    let (status, _) = get_json(&app, "/api/v1/health/live").await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn responses_carry_a_trace_id_header() {
    let app = spawn_app(ApiKeyPolicy::disabled()).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/hierarchy")
            .to_request(),
    )
    .await;

    assert!(response.headers().contains_key("trace-id"));
}
