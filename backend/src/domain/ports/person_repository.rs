//! Persistence port for person records.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageParams;
use thiserror::Error;

use crate::domain::person::{NewPerson, Person, PersonStatus, PersonType, PersonUpdate};

/// Errors surfaced by person stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersonRepositoryError {
    /// The backing store could not be reached.
    #[error("person store connection failed: {message}")]
    Connection {
        /// Human-readable connection failure detail.
        message: String,
    },
    /// A query failed after a connection was established.
    #[error("person store query failed: {message}")]
    Query {
        /// Human-readable query failure detail.
        message: String,
    },
    /// The requested person does not exist.
    #[error("person {id} not found")]
    NotFound {
        /// Identifier that failed to resolve.
        id: i32,
    },
}

impl PersonRepositoryError {
    /// Build a connection error from any displayable source.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a query error from any displayable source.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Build a not-found error for the given identifier.
    #[must_use]
    pub fn not_found(id: i32) -> Self {
        Self::NotFound { id }
    }
}

/// Filters applied to listing and counting queries.
///
/// `manager_id` uses a nested `Option`: `None` means "no filter",
/// `Some(None)` selects people without a manager, `Some(Some(id))`
/// selects direct reports of `id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonFilter {
    /// Case-insensitive substring match over name, job title, and email.
    pub search: Option<String>,
    /// Exact department match.
    pub department: Option<String>,
    /// Manager filter, see type-level docs.
    pub manager_id: Option<Option<i32>>,
    /// Exact person-type match.
    pub person_type: Option<PersonType>,
    /// Exact status match.
    pub status: Option<PersonStatus>,
}

impl PersonFilter {
    /// Whether a person satisfies every set filter.
    #[must_use]
    pub fn matches(&self, person: &Person) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = person.name.to_lowercase().contains(&needle)
                || person.job_title.to_lowercase().contains(&needle)
                || person
                    .email
                    .as_deref()
                    .is_some_and(|email| email.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if let Some(department) = &self.department
            && person.department != *department
        {
            return false;
        }
        if let Some(manager_id) = self.manager_id
            && person.manager_id != manager_id
        {
            return false;
        }
        if let Some(person_type) = self.person_type
            && person.person_type != person_type
        {
            return false;
        }
        if let Some(status) = self.status
            && person.status != status
        {
            return false;
        }
        true
    }
}

/// Sortable columns for person listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    /// Sort by display name.
    #[default]
    Name,
    /// Sort by job title.
    JobTitle,
    /// Sort by department.
    Department,
    /// Sort by creation timestamp.
    CreatedAt,
    /// Sort by last-update timestamp.
    UpdatedAt,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(Self::Name),
            "jobTitle" => Ok(Self::JobTitle),
            "department" => Ok(Self::Department),
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

/// Sort order for person listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// A sort request for person listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersonSort {
    /// Column to order by.
    pub field: SortField,
    /// Direction to order in.
    pub direction: SortDirection,
}

/// A department and how many people belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentCount {
    /// Department name.
    pub name: String,
    /// Number of people in the department.
    pub count: u64,
}

/// A manager together with their direct-report headcount.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerRecord {
    /// The manager's person record.
    pub person: Person,
    /// Number of people reporting directly to them.
    pub direct_reports: u64,
}

/// Store abstraction for person records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Fetch one person by identifier.
    async fn find_by_id(&self, id: i32) -> Result<Option<Person>, PersonRepositoryError>;

    /// Fetch the direct reports of a person, sorted by name then id.
    async fn find_direct_reports(&self, id: i32) -> Result<Vec<Person>, PersonRepositoryError>;

    /// Fetch the first person without a manager, by name then id.
    async fn find_root(&self) -> Result<Option<Person>, PersonRepositoryError>;

    /// List people matching a filter, with the total match count.
    async fn list(
        &self,
        filter: &PersonFilter,
        sort: Option<PersonSort>,
        page: PageParams,
    ) -> Result<(Vec<Person>, u64), PersonRepositoryError>;

    /// Whether a person with the identifier exists.
    async fn exists(&self, id: i32) -> Result<bool, PersonRepositoryError>;

    /// Count people matching a filter.
    async fn count(&self, filter: &PersonFilter) -> Result<u64, PersonRepositoryError>;

    /// Distinct department names in ascending order.
    async fn departments(&self) -> Result<Vec<String>, PersonRepositoryError>;

    /// Headcount per department, largest first then name ascending.
    async fn department_counts(&self) -> Result<Vec<DepartmentCount>, PersonRepositoryError>;

    /// People with at least one direct report, sorted by name then id.
    async fn managers(&self) -> Result<Vec<ManagerRecord>, PersonRepositoryError>;

    /// Persist a new person and return the stored record.
    async fn create(&self, person: NewPerson) -> Result<Person, PersonRepositoryError>;

    /// Apply an update and return the stored record.
    ///
    /// Fails with [`PersonRepositoryError::NotFound`] when the person
    /// does not exist.
    async fn update(&self, id: i32, update: PersonUpdate) -> Result<Person, PersonRepositoryError>;

    /// Remove a person, detaching their direct reports first.
    ///
    /// Fails with [`PersonRepositoryError::NotFound`] when the person
    /// does not exist.
    async fn delete(&self, id: i32) -> Result<(), PersonRepositoryError>;
}

/// In-memory store backing tests and database-free deployments.
#[derive(Debug, Default)]
pub struct InMemoryPersonRepository {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    people: BTreeMap<i32, Person>,
    next_id: i32,
}

impl InMemoryPersonRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with the given records.
    ///
    /// The id counter resumes after the highest preloaded identifier.
    #[must_use]
    pub fn with_people(people: Vec<Person>) -> Self {
        let next_id = people.iter().map(|p| p.id).max().unwrap_or(0);
        let people = people.into_iter().map(|p| (p.id, p)).collect();
        Self {
            inner: RwLock::new(Inner { people, next_id }),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|err| err.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|err| err.into_inner())
    }
}

fn by_name_then_id(a: &Person, b: &Person) -> std::cmp::Ordering {
    a.name.cmp(&b.name).then(a.id.cmp(&b.id))
}

fn apply_sort(people: &mut [Person], sort: PersonSort) {
    people.sort_by(|a, b| {
        let ordering = match sort.field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::JobTitle => a.job_title.cmp(&b.job_title),
            SortField::Department => a.department.cmp(&b.department),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        let ordering = ordering.then(a.id.cmp(&b.id));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Person>, PersonRepositoryError> {
        Ok(self.read().people.get(&id).cloned())
    }

    async fn find_direct_reports(&self, id: i32) -> Result<Vec<Person>, PersonRepositoryError> {
        let mut reports: Vec<Person> = self
            .read()
            .people
            .values()
            .filter(|p| p.manager_id == Some(id))
            .cloned()
            .collect();
        reports.sort_by(by_name_then_id);
        Ok(reports)
    }

    async fn find_root(&self) -> Result<Option<Person>, PersonRepositoryError> {
        let mut roots: Vec<Person> = self
            .read()
            .people
            .values()
            .filter(|p| p.manager_id.is_none())
            .cloned()
            .collect();
        roots.sort_by(by_name_then_id);
        Ok(roots.into_iter().next())
    }

    async fn list(
        &self,
        filter: &PersonFilter,
        sort: Option<PersonSort>,
        page: PageParams,
    ) -> Result<(Vec<Person>, u64), PersonRepositoryError> {
        let mut matches: Vec<Person> = self
            .read()
            .people
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        apply_sort(&mut matches, sort.unwrap_or_default());
        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok((items, total))
    }

    async fn exists(&self, id: i32) -> Result<bool, PersonRepositoryError> {
        Ok(self.read().people.contains_key(&id))
    }

    async fn count(&self, filter: &PersonFilter) -> Result<u64, PersonRepositoryError> {
        Ok(self
            .read()
            .people
            .values()
            .filter(|p| filter.matches(p))
            .count() as u64)
    }

    async fn departments(&self) -> Result<Vec<String>, PersonRepositoryError> {
        let mut departments: Vec<String> = self
            .read()
            .people
            .values()
            .map(|p| p.department.clone())
            .collect();
        departments.sort();
        departments.dedup();
        Ok(departments)
    }

    async fn department_counts(&self) -> Result<Vec<DepartmentCount>, PersonRepositoryError> {
        let mut by_department: BTreeMap<String, u64> = BTreeMap::new();
        for person in self.read().people.values() {
            *by_department.entry(person.department.clone()).or_default() += 1;
        }
        let mut counts: Vec<DepartmentCount> = by_department
            .into_iter()
            .map(|(name, count)| DepartmentCount { name, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        Ok(counts)
    }

    async fn managers(&self) -> Result<Vec<ManagerRecord>, PersonRepositoryError> {
        let guard = self.read();
        let mut report_counts: BTreeMap<i32, u64> = BTreeMap::new();
        for person in guard.people.values() {
            if let Some(manager_id) = person.manager_id {
                *report_counts.entry(manager_id).or_default() += 1;
            }
        }
        let mut managers: Vec<ManagerRecord> = report_counts
            .into_iter()
            .filter_map(|(id, direct_reports)| {
                guard.people.get(&id).map(|person| ManagerRecord {
                    person: person.clone(),
                    direct_reports,
                })
            })
            .collect();
        managers.sort_by(|a, b| by_name_then_id(&a.person, &b.person));
        Ok(managers)
    }

    async fn create(&self, person: NewPerson) -> Result<Person, PersonRepositoryError> {
        let mut guard = self.write();
        guard.next_id += 1;
        let id = guard.next_id;
        let now = Utc::now();
        let stored = Person {
            id,
            name: person.name,
            job_title: person.job_title,
            department: person.department,
            manager_id: person.manager_id,
            photo_path: person.photo_path,
            person_type: person.person_type,
            status: person.status,
            email: person.email,
            phone: person.phone,
            location: person.location,
            hire_date: person.hire_date,
            created_at: now,
            updated_at: now,
        };
        guard.people.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i32, update: PersonUpdate) -> Result<Person, PersonRepositoryError> {
        let mut guard = self.write();
        let person = guard
            .people
            .get_mut(&id)
            .ok_or(PersonRepositoryError::NotFound { id })?;
        if let Some(name) = update.name {
            person.name = name;
        }
        if let Some(job_title) = update.job_title {
            person.job_title = job_title;
        }
        if let Some(department) = update.department {
            person.department = department;
        }
        if let Some(manager_id) = update.manager_id {
            person.manager_id = manager_id;
        }
        if let Some(photo_path) = update.photo_path {
            person.photo_path = photo_path;
        }
        if let Some(person_type) = update.person_type {
            person.person_type = person_type;
        }
        if let Some(status) = update.status {
            person.status = status;
        }
        if let Some(email) = update.email {
            person.email = email;
        }
        if let Some(phone) = update.phone {
            person.phone = phone;
        }
        if let Some(location) = update.location {
            person.location = location;
        }
        if let Some(hire_date) = update.hire_date {
            person.hire_date = hire_date;
        }
        person.updated_at = Utc::now();
        Ok(person.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), PersonRepositoryError> {
        let mut guard = self.write();
        if !guard.people.contains_key(&id) {
            return Err(PersonRepositoryError::NotFound { id });
        }
        for person in guard.people.values_mut() {
            if person.manager_id == Some(id) {
                person.manager_id = None;
            }
        }
        guard.people.remove(&id);
        Ok(())
    }
}
