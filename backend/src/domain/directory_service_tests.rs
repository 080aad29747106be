use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rstest::rstest;

use super::*;
use crate::domain::error::ErrorCode;
use crate::domain::ports::{InMemoryPersonRepository, MockPersonRepository};

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
        email: None,
        phone: None,
        location: None,
        hire_date: None,
        created_at: now,
        updated_at: now,
    }
}

/// Event sink that records delivered event names.
#[derive(Default)]
struct CollectingSink {
    seen: Mutex<Vec<&'static str>>,
}

impl CollectingSink {
    fn names(&self) -> Vec<&'static str> {
        self.seen.lock().expect("sink mutex poisoned").clone()
    }
}

#[async_trait]
impl EventSink for CollectingSink {
    async fn deliver(&self, event: &PersonEvent) {
        self.seen
            .lock()
            .expect("sink mutex poisoned")
            .push(event.kind.name());
    }
}

fn service_with_people(people: Vec<Person>) -> (DirectoryService, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::default());
    let service = DirectoryService::new(
        Arc::new(InMemoryPersonRepository::with_people(people)),
        sink.clone(),
    );
    (service, sink)
}

fn org() -> Vec<Person> {
    vec![
        person(1, "Ada", None),
        person(2, "Brian", Some(1)),
        person(3, "Carol", Some(2)),
    ]
}

#[tokio::test]
async fn get_returns_manager_and_reports() {
    let (service, _) = service_with_people(org());
    let detail = service.get(2).await.expect("get failed");
    assert_eq!(detail.person.name, "Brian");
    assert_eq!(detail.manager.map(|m| m.id), Some(1));
    let reports: Vec<i32> = detail.direct_reports.iter().map(|p| p.id).collect();
    assert_eq!(reports, vec![3]);
}

#[tokio::test]
async fn get_unknown_person_is_not_found() {
    let (service, _) = service_with_people(org());
    let err = service.get(99).await.expect_err("found");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Person with identifier '99' not found");
}

#[tokio::test]
async fn create_rejects_unknown_manager() {
    let (service, sink) = service_with_people(org());
    let err = service
        .create(NewPerson {
            name: "Dana".to_owned(),
            job_title: "Designer".to_owned(),
            department: "Design".to_owned(),
            manager_id: Some(99),
            ..NewPerson::default()
        })
        .await
        .expect_err("created");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Manager with identifier '99' not found");
    assert!(sink.names().is_empty());
}

#[tokio::test]
async fn create_rejects_blank_required_fields() {
    let (service, _) = service_with_people(org());
    let err = service
        .create(NewPerson {
            name: "  ".to_owned(),
            job_title: "Designer".to_owned(),
            department: "Design".to_owned(),
            ..NewPerson::default()
        })
        .await
        .expect_err("created");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn create_publishes_created_event() {
    let (service, sink) = service_with_people(org());
    let created = service
        .create(NewPerson {
            name: "Dana".to_owned(),
            job_title: "Designer".to_owned(),
            department: "Design".to_owned(),
            manager_id: Some(1),
            ..NewPerson::default()
        })
        .await
        .expect("create failed");
    assert_eq!(created.manager_id, Some(1));
    assert_eq!(sink.names(), vec!["person.created"]);
}

#[tokio::test]
async fn update_rejects_self_management() {
    let (service, _) = service_with_people(org());
    let err = service
        .update(
            2,
            PersonUpdate {
                manager_id: Some(Some(2)),
                ..PersonUpdate::default()
            },
        )
        .await
        .expect_err("updated");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn update_rejects_manager_from_own_subtree() {
    let (service, sink) = service_with_people(org());
    // Carol reports to Brian; making Brian report to Carol closes a loop.
    let err = service
        .update(
            2,
            PersonUpdate {
                manager_id: Some(Some(3)),
                ..PersonUpdate::default()
            },
        )
        .await
        .expect_err("updated");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert!(err.message().contains("circular"));
    assert!(sink.names().is_empty());
}

#[tokio::test]
async fn update_rejects_empty_payload() {
    let (service, _) = service_with_people(org());
    let err = service
        .update(2, PersonUpdate::default())
        .await
        .expect_err("updated");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn update_publishes_change_events() {
    let (service, sink) = service_with_people(org());
    let updated = service
        .update(
            3,
            PersonUpdate {
                manager_id: Some(Some(1)),
                status: Some(PersonStatus::Inactive),
                ..PersonUpdate::default()
            },
        )
        .await
        .expect("update failed");
    assert_eq!(updated.manager_id, Some(1));
    assert_eq!(updated.status, PersonStatus::Inactive);
    assert_eq!(
        sink.names(),
        vec![
            "person.updated",
            "person.manager_changed",
            "person.status_changed",
        ]
    );
}

#[tokio::test]
async fn delete_detaches_reports_and_publishes() {
    let (service, sink) = service_with_people(org());
    service.delete(2).await.expect("delete failed");
    let carol = service.get(3).await.expect("get failed");
    assert_eq!(carol.person.manager_id, None);
    assert_eq!(sink.names(), vec!["person.deleted"]);
}

#[tokio::test]
async fn delete_unknown_person_is_not_found() {
    let (service, sink) = service_with_people(org());
    let err = service.delete(99).await.expect_err("deleted");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(sink.names().is_empty());
}

#[tokio::test]
async fn search_scopes_to_the_requested_root() {
    let (service, _) = service_with_people(org());
    let results = service.search(Some(2), "carol").await.expect("search failed");
    let ids: Vec<i32> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3]);
    let scoped_out = service.search(Some(2), "ada").await.expect("search failed");
    assert!(scoped_out.is_empty());
}

#[tokio::test]
async fn statistics_aggregate_counts() {
    let mut people = org();
    people[2].person_type = PersonType::Partner;
    people[2].status = PersonStatus::Inactive;
    people[2].department = "Sales".to_owned();
    let (service, _) = service_with_people(people);

    let stats = service.statistics().await.expect("statistics failed");

    assert_eq!(stats.total, 3);
    assert_eq!(stats.employees, 2);
    assert_eq!(stats.partners, 1);
    assert_eq!(stats.active, 2);
    assert_eq!(stats.inactive, 1);
    assert_eq!(stats.departments[0].name, "Engineering");
    assert_eq!(stats.departments[0].count, 2);
}

#[rstest]
#[case::connection(
    PersonRepositoryError::connection("refused"),
    ErrorCode::ServiceUnavailable,
)]
#[case::query(PersonRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn store_failures_map_to_transport_codes(
    #[case] store_error: PersonRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut store = MockPersonRepository::new();
    store
        .expect_departments()
        .return_once(move || Err(store_error));
    let service = DirectoryService::new(Arc::new(store), Arc::new(CollectingSink::default()));

    let err = service.departments().await.expect_err("listed");
    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn corrupt_chain_surfaces_cycle_detected() {
    let (service, _) = service_with_people(vec![
        person(1, "Ada", Some(2)),
        person(2, "Brian", Some(1)),
        person(3, "Carol", Some(2)),
    ]);
    let err = service.management_chain(3).await.expect_err("resolved");
    assert_eq!(err.code(), ErrorCode::CycleDetected);
}
