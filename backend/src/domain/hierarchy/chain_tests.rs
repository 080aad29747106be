use chrono::Utc;

use super::*;
use crate::domain::person::{PersonStatus, PersonType};
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
        email: None,
        phone: None,
        location: None,
        hire_date: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn chain_runs_nearest_manager_first_to_the_root() {
    let store = InMemoryPersonRepository::with_people(vec![
        person(1, "Ada", None),
        person(2, "Brian", Some(1)),
        person(3, "Carol", Some(2)),
    ]);

    let chain = resolve_management_chain(&store, 3)
        .await
        .expect("resolution failed");

    let ids: Vec<i32> = chain.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn chain_excludes_the_starting_person() {
    let store = InMemoryPersonRepository::with_people(vec![
        person(1, "Ada", None),
        person(2, "Brian", Some(1)),
    ]);

    let chain = resolve_management_chain(&store, 2)
        .await
        .expect("resolution failed");

    assert!(chain.iter().all(|p| p.id != 2));
}

#[tokio::test]
async fn root_person_has_empty_chain() {
    let store = InMemoryPersonRepository::with_people(vec![person(1, "Ada", None)]);
    let chain = resolve_management_chain(&store, 1)
        .await
        .expect("resolution failed");
    assert!(chain.is_empty());
}

#[tokio::test]
async fn self_managed_person_has_empty_chain() {
    let store = InMemoryPersonRepository::with_people(vec![person(1, "Ada", Some(1))]);
    let chain = resolve_management_chain(&store, 1)
        .await
        .expect("resolution failed");
    assert!(chain.is_empty());
}

#[tokio::test]
async fn longer_loops_are_reported_as_cycles() {
    let store = InMemoryPersonRepository::with_people(vec![
        person(1, "Ada", Some(3)),
        person(2, "Brian", Some(1)),
        person(3, "Carol", Some(2)),
    ]);

    let err = resolve_management_chain(&store, 2)
        .await
        .expect_err("resolved");
    assert!(matches!(err, HierarchyError::CycleDetected { .. }));
}

#[tokio::test]
async fn dangling_manager_ends_the_walk() {
    let store = InMemoryPersonRepository::with_people(vec![
        person(2, "Brian", Some(99)),
        person(3, "Carol", Some(2)),
    ]);

    let chain = resolve_management_chain(&store, 3)
        .await
        .expect("resolution failed");

    let ids: Vec<i32> = chain.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn unknown_start_person_is_reported() {
    let store = InMemoryPersonRepository::new();
    let err = resolve_management_chain(&store, 7)
        .await
        .expect_err("resolved");
    assert!(matches!(err, HierarchyError::PersonNotFound { id: 7 }));
}
