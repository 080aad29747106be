//! Row types bridging the `people` table and the domain `Person`.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use tracing::warn;

use super::schema::people;
use crate::domain::person::{NewPerson, Person, PersonUpdate};

/// One row of the `people` table as stored.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = people)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PersonRow {
    pub id: i32,
    pub name: String,
    pub job_title: String,
    pub department: String,
    pub manager_id: Option<i32>,
    pub photo_path: Option<String>,
    pub person_type: String,
    pub status: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Decode a stored enum string leniently.
///
/// Rows written by other tools may carry casings or values this build
/// does not know. Listing endpoints must not fail wholesale over one bad
/// row, so unknown values fall back to the default and are logged.
fn decode_enum<T>(row_id: i32, column: &'static str, raw: &str) -> T
where
    T: std::str::FromStr + Default,
{
    raw.parse().unwrap_or_else(|_| {
        warn!(row_id, column, value = raw, "unknown enum value in people row");
        T::default()
    })
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        let person_type = decode_enum(row.id, "person_type", &row.person_type);
        let status = decode_enum(row.id, "status", &row.status);
        Self {
            id: row.id,
            name: row.name,
            job_title: row.job_title,
            department: row.department,
            manager_id: row.manager_id,
            photo_path: row.photo_path,
            person_type,
            status,
            email: row.email,
            phone: row.phone,
            location: row.location,
            hire_date: row.hire_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable row for a new person.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = people)]
pub struct NewPersonRow {
    pub name: String,
    pub job_title: String,
    pub department: String,
    pub manager_id: Option<i32>,
    pub photo_path: Option<String>,
    pub person_type: String,
    pub status: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

impl From<NewPerson> for NewPersonRow {
    fn from(person: NewPerson) -> Self {
        Self {
            name: person.name,
            job_title: person.job_title,
            department: person.department,
            manager_id: person.manager_id,
            photo_path: person.photo_path,
            person_type: person.person_type.as_str().to_owned(),
            status: person.status.as_str().to_owned(),
            email: person.email,
            phone: person.phone,
            location: person.location,
            hire_date: person.hire_date,
        }
    }
}

/// Changeset applying a partial update.
///
/// `Option` fields are skipped when `None`; the nested `Option` fields
/// write SQL `NULL` when the inner value is `None`, which is how clients
/// clear a nullable column such as `manager_id`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = people)]
pub struct PersonChangeset {
    pub name: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub manager_id: Option<Option<i32>>,
    pub photo_path: Option<Option<String>>,
    pub person_type: Option<String>,
    pub status: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub hire_date: Option<Option<NaiveDate>>,
    pub updated_at: DateTime<Utc>,
}

impl From<PersonUpdate> for PersonChangeset {
    fn from(update: PersonUpdate) -> Self {
        Self {
            name: update.name,
            job_title: update.job_title,
            department: update.department,
            manager_id: update.manager_id,
            photo_path: update.photo_path,
            person_type: update.person_type.map(|t| t.as_str().to_owned()),
            status: update.status.map(|s| s.as_str().to_owned()),
            email: update.email,
            phone: update.phone,
            location: update.location,
            hire_date: update.hire_date,
            updated_at: Utc::now(),
        }
    }
}
