//! Application service coordinating people, trees, and events.
//!
//! [`DirectoryService`] is the single entry point the HTTP layer talks
//! to. It owns the translation from port and traversal errors into the
//! transport-agnostic [`Error`] taxonomy, enforces the invariants a
//! plain store cannot (manager existence, cycle prevention), and
//! publishes domain events after successful mutations.

use std::sync::Arc;

use pagination::{Page, PageParams};
use tracing::warn;

use crate::domain::ApiResult;
use crate::domain::error::Error;
use crate::domain::events::{EventSink, PersonEvent, PersonEventKind};
use crate::domain::hierarchy::{
    HierarchyError, HierarchyNode, SearchResult, build_hierarchy, resolve_management_chain,
    search_hierarchy,
};
use crate::domain::person::{NewPerson, Person, PersonStatus, PersonType, PersonUpdate};
use crate::domain::ports::{
    DepartmentCount, ManagerRecord, PersonFilter, PersonRepository, PersonRepositoryError,
    PersonSort,
};

/// A person with their immediate organisational context.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonDetail {
    /// The person themselves.
    pub person: Person,
    /// Their manager, when one is assigned and resolvable.
    pub manager: Option<Person>,
    /// Their direct reports, sorted by name.
    pub direct_reports: Vec<Person>,
}

/// Aggregate headcounts across the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    /// Total number of people.
    pub total: u64,
    /// People typed as employees.
    pub employees: u64,
    /// People typed as partners.
    pub partners: u64,
    /// People with active status.
    pub active: u64,
    /// People with inactive status.
    pub inactive: u64,
    /// Headcount per department, largest first.
    pub departments: Vec<DepartmentCount>,
}

fn map_store_error(err: PersonRepositoryError) -> Error {
    match err {
        PersonRepositoryError::Connection { message } => {
            warn!(error = %message, "person store unreachable");
            Error::service_unavailable("person store is unavailable")
        }
        PersonRepositoryError::Query { message } => {
            warn!(error = %message, "person store query failed");
            Error::internal("person store query failed")
        }
        PersonRepositoryError::NotFound { id } => Error::entity_not_found("Person", id),
    }
}

fn map_hierarchy_error(err: HierarchyError) -> Error {
    match err {
        HierarchyError::PersonNotFound { id } => Error::entity_not_found("Person", id),
        HierarchyError::RootNotFound => Error::not_found("no root person found"),
        HierarchyError::CycleDetected { id } => {
            warn!(person_id = id, "management cycle detected in stored data");
            Error::cycle_detected(format!("management cycle detected at person {id}"))
        }
        HierarchyError::DepthExceeded { limit } => {
            Error::internal(format!("hierarchy exceeds maximum depth of {limit}"))
        }
        HierarchyError::TooManyNodes { limit } => {
            Error::internal(format!("hierarchy exceeds maximum size of {limit} nodes"))
        }
        HierarchyError::Store(err) => map_store_error(err),
    }
}

/// Directory operations over an injected store and event sink.
#[derive(Clone)]
pub struct DirectoryService {
    store: Arc<dyn PersonRepository>,
    events: Arc<dyn EventSink>,
}

impl DirectoryService {
    /// Build a service over the given store and event sink.
    #[must_use]
    pub fn new(store: Arc<dyn PersonRepository>, events: Arc<dyn EventSink>) -> Self {
        Self { store, events }
    }

    /// List people matching `filter`, one page at a time.
    pub async fn list(
        &self,
        filter: &PersonFilter,
        sort: Option<PersonSort>,
        page: PageParams,
    ) -> ApiResult<Page<Person>> {
        let (people, total) = self
            .store
            .list(filter, sort, page)
            .await
            .map_err(map_store_error)?;
        Ok(Page::new(people, total, page))
    }

    /// Fetch one person with their manager and direct reports.
    pub async fn get(&self, id: i32) -> ApiResult<PersonDetail> {
        let person = self
            .store
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::entity_not_found("Person", id))?;
        let manager = match person.manager_id {
            Some(manager_id) if manager_id != id => self
                .store
                .find_by_id(manager_id)
                .await
                .map_err(map_store_error)?,
            _ => None,
        };
        let direct_reports = self
            .store
            .find_direct_reports(id)
            .await
            .map_err(map_store_error)?;
        Ok(PersonDetail {
            person,
            manager,
            direct_reports,
        })
    }

    /// Create a person, validating the referenced manager exists.
    pub async fn create(&self, new_person: NewPerson) -> ApiResult<Person> {
        new_person
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        if let Some(manager_id) = new_person.manager_id {
            let exists = self
                .store
                .exists(manager_id)
                .await
                .map_err(map_store_error)?;
            if !exists {
                return Err(Error::entity_not_found("Manager", manager_id));
            }
        }
        let person = self
            .store
            .create(new_person)
            .await
            .map_err(map_store_error)?;
        self.events.deliver(&PersonEvent::created(&person)).await;
        Ok(person)
    }

    /// Apply a partial update, guarding manager assignments.
    ///
    /// Assigning a person as their own manager, or to anyone in their
    /// own reporting subtree, is rejected before the store is touched.
    pub async fn update(&self, id: i32, update: PersonUpdate) -> ApiResult<Person> {
        update
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        if update.is_empty() {
            return Err(Error::invalid_request("no fields to update"));
        }
        let previous = self
            .store
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::entity_not_found("Person", id))?;

        if let Some(Some(manager_id)) = update.manager_id {
            self.guard_manager_assignment(id, manager_id).await?;
        }

        let person = self
            .store
            .update(id, update)
            .await
            .map_err(map_store_error)?;

        self.events
            .deliver(&PersonEvent::now(id, PersonEventKind::Updated))
            .await;
        if person.manager_id != previous.manager_id {
            self.events
                .deliver(&PersonEvent::now(
                    id,
                    PersonEventKind::ManagerChanged {
                        previous: previous.manager_id,
                        current: person.manager_id,
                    },
                ))
                .await;
        }
        if person.status != previous.status {
            self.events
                .deliver(&PersonEvent::now(
                    id,
                    PersonEventKind::StatusChanged {
                        previous: previous.status,
                        current: person.status,
                    },
                ))
                .await;
        }
        Ok(person)
    }

    /// Reject manager assignments that would break the tree shape.
    async fn guard_manager_assignment(&self, id: i32, manager_id: i32) -> ApiResult<()> {
        if manager_id == id {
            return Err(Error::invalid_request(
                "a person cannot be their own manager",
            ));
        }
        let exists = self
            .store
            .exists(manager_id)
            .await
            .map_err(map_store_error)?;
        if !exists {
            return Err(Error::entity_not_found("Manager", manager_id));
        }
        // Walking up from the proposed manager must not pass through the
        // person being updated, or the assignment closes a loop.
        let chain = resolve_management_chain(self.store.as_ref(), manager_id)
            .await
            .map_err(map_hierarchy_error)?;
        if chain.iter().any(|ancestor| ancestor.id == id) {
            return Err(Error::invalid_request(
                "manager assignment would create a circular reporting chain",
            ));
        }
        Ok(())
    }

    /// Delete a person, detaching their direct reports.
    pub async fn delete(&self, id: i32) -> ApiResult<()> {
        let exists = self.store.exists(id).await.map_err(map_store_error)?;
        if !exists {
            return Err(Error::entity_not_found("Person", id));
        }
        self.store.delete(id).await.map_err(map_store_error)?;
        self.events
            .deliver(&PersonEvent::now(id, PersonEventKind::Deleted))
            .await;
        Ok(())
    }

    /// Resolve the management chain for a person, nearest manager first.
    pub async fn management_chain(&self, id: i32) -> ApiResult<Vec<Person>> {
        resolve_management_chain(self.store.as_ref(), id)
            .await
            .map_err(map_hierarchy_error)
    }

    /// Build the organisational tree, optionally scoped to a root.
    pub async fn hierarchy(&self, root_id: Option<i32>) -> ApiResult<HierarchyNode> {
        build_hierarchy(self.store.as_ref(), root_id)
            .await
            .map_err(map_hierarchy_error)
    }

    /// Search the organisational tree for a free-text query.
    pub async fn search(&self, root_id: Option<i32>, query: &str) -> ApiResult<Vec<SearchResult>> {
        let tree = self.hierarchy(root_id).await?;
        Ok(search_hierarchy(&tree, query))
    }

    /// Distinct department names in ascending order.
    pub async fn departments(&self) -> ApiResult<Vec<String>> {
        self.store.departments().await.map_err(map_store_error)
    }

    /// People with direct reports and their headcounts.
    pub async fn managers(&self) -> ApiResult<Vec<ManagerRecord>> {
        self.store.managers().await.map_err(map_store_error)
    }

    /// Aggregate headcounts by type, status, and department.
    pub async fn statistics(&self) -> ApiResult<Statistics> {
        let total = self
            .store
            .count(&PersonFilter::default())
            .await
            .map_err(map_store_error)?;
        let employees = self
            .store
            .count(&PersonFilter {
                person_type: Some(PersonType::Employee),
                ..PersonFilter::default()
            })
            .await
            .map_err(map_store_error)?;
        let partners = total.saturating_sub(employees);
        let active = self
            .store
            .count(&PersonFilter {
                status: Some(PersonStatus::Active),
                ..PersonFilter::default()
            })
            .await
            .map_err(map_store_error)?;
        let inactive = total.saturating_sub(active);
        let departments = self
            .store
            .department_counts()
            .await
            .map_err(map_store_error)?;
        Ok(Statistics {
            total,
            employees,
            partners,
            active,
            inactive,
            departments,
        })
    }
}

#[cfg(test)]
#[path = "directory_service_tests.rs"]
mod tests;
