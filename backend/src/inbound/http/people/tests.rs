use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::Utc;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{CompositeEventSink, DirectoryService};
use crate::domain::ports::InMemoryPersonRepository;

fn person(id: i32, name: &str, manager_id: Option<i32>) -> Person {
    let now = Utc::now();
    Person {
        id,
        name: name.to_owned(),
        job_title: "Engineer".to_owned(),
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

fn seeded_state() -> web::Data<HttpState> {
    let store = Arc::new(InMemoryPersonRepository::with_people(vec![
        person(1, "Ada", None),
        person(2, "Brian", Some(1)),
        person(3, "Carol", Some(1)),
        person(4, "Dan", Some(2)),
    ]));
    let directory = Arc::new(DirectoryService::new(
        store,
        Arc::new(CompositeEventSink::default()),
    ));
    web::Data::new(HttpState::new(directory))
}

fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).service(
        web::scope("/api/v1")
            .service(list_people)
            .service(create_person)
            .service(get_person)
            .service(update_person)
            .service(delete_person)
            .service(list_departments)
            .service(list_managers)
            .service(statistics),
    )
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
async fn list_wraps_people_in_paginated_envelope() {
    let app = actix_test::init_service(test_app(seeded_state())).await;
    let (status, body) = get_json(&app, "/api/v1/people?page=1&limit=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["meta"]["total"], 4);
    assert_eq!(body["meta"]["totalPages"], 2);
    assert_eq!(body["meta"]["hasNext"], true);
    assert!(body.get("timestamp").is_some());
    // Default sort is name ascending.
    assert_eq!(body["data"][0]["name"], "Ada");
    assert_eq!(body["data"][0]["jobTitle"], "Engineer");
}

#[rstest]
#[case::search("search=brian", vec!["Brian"])]
#[case::roots("managerId=null", vec!["Ada"])]
#[case::reports("managerId=1", vec!["Brian", "Carol"])]
#[case::descending("sortBy=name&sortOrder=desc", vec!["Dan", "Carol", "Brian", "Ada"])]
#[actix_web::test]
async fn list_applies_query_filters(#[case] query: &str, #[case] expected: Vec<&str>) {
    let app = actix_test::init_service(test_app(seeded_state())).await;
    let (status, body) = get_json(&app, &format!("/api/v1/people?{query}")).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, expected);
}

#[rstest]
#[case::bad_manager("managerId=soon")]
#[case::bad_type("personType=Contractor")]
#[case::bad_sort("sortBy=height")]
#[actix_web::test]
async fn list_rejects_malformed_filters(#[case] query: &str) {
    let app = actix_test::init_service(test_app(seeded_state())).await;
    let (status, body) = get_json(&app, &format!("/api/v1/people?{query}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn get_returns_manager_and_reports() {
    let app = actix_test::init_service(test_app(seeded_state())).await;
    let (status, body) = get_json(&app, "/api/v1/people/2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Brian");
    assert_eq!(body["data"]["manager"]["name"], "Ada");
    assert_eq!(body["data"]["directReports"][0]["name"], "Dan");
}

#[actix_web::test]
async fn get_unknown_person_returns_envelope_error() {
    let app = actix_test::init_service(test_app(seeded_state())).await;
    let (status, body) = get_json(&app, "/api/v1/people/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], "Person with identifier '99' not found");
}

#[actix_web::test]
async fn create_returns_created_person() {
    let app = actix_test::init_service(test_app(seeded_state())).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/people")
        .set_json(json!({
            "name": "Erin",
            "jobTitle": "Designer",
            "department": "Design",
            "managerId": 1,
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = serde_json::from_slice(&actix_test::read_body(response).await)
        .expect("response JSON");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 5);
    assert_eq!(body["data"]["personType"], "Employee");
    assert_eq!(body["data"]["status"], "Active");
}

#[actix_web::test]
async fn create_with_unknown_manager_is_not_found() {
    let app = actix_test::init_service(test_app(seeded_state())).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/people")
        .set_json(json!({
            "name": "Erin",
            "jobTitle": "Designer",
            "department": "Design",
            "managerId": 99,
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_distinguishes_null_from_missing() {
    let app = actix_test::init_service(test_app(seeded_state())).await;
    let request = actix_test::TestRequest::put()
        .uri("/api/v1/people/2")
        .set_json(json!({ "managerId": null }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&actix_test::read_body(response).await)
        .expect("response JSON");
    assert_eq!(body["data"]["managerId"], Value::Null);
    assert_eq!(body["data"]["name"], "Brian");
}

#[actix_web::test]
async fn update_rejects_circular_manager_assignment() {
    let app = actix_test::init_service(test_app(seeded_state())).await;
    let request = actix_test::TestRequest::put()
        .uri("/api/v1/people/1")
        .set_json(json!({ "managerId": 4 }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&actix_test::read_body(response).await)
        .expect("response JSON");
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn delete_returns_no_content_then_not_found() {
    let app = actix_test::init_service(test_app(seeded_state())).await;
    let first = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/people/4")
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);

    let second = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/people/4")
            .to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn departments_managers_and_statistics_report_the_org() {
    let app = actix_test::init_service(test_app(seeded_state())).await;

    let (status, body) = get_json(&app, "/api/v1/departments").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["Engineering"]));

    let (status, body) = get_json(&app, "/api/v1/managers").await;
    assert_eq!(status, StatusCode::OK);
    let managers: Vec<(&str, u64)> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|m| Some((m["name"].as_str()?, m["directReports"].as_u64()?)))
        .collect();
    assert_eq!(managers, vec![("Ada", 2), ("Brian", 1)]);

    let (status, body) = get_json(&app, "/api/v1/statistics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 4);
    assert_eq!(body["data"]["employees"], 4);
    assert_eq!(body["data"]["departments"][0]["name"], "Engineering");
    assert_eq!(body["data"]["departments"][0]["count"], 4);
}
