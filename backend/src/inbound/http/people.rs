//! People API handlers.
//!
//! ```text
//! GET    /api/v1/people?search=ada&department=Engineering&page=1&limit=10
//! POST   /api/v1/people
//! GET    /api/v1/people/42
//! PUT    /api/v1/people/42
//! DELETE /api/v1/people/42
//! GET    /api/v1/departments
//! GET    /api/v1/managers
//! GET    /api/v1/statistics
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use pagination::PageParams;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::directory_service::{PersonDetail, Statistics};
use crate::domain::ports::{ManagerRecord, PersonFilter, PersonSort, SortDirection, SortField};
use crate::domain::{Error, NewPerson, Person, PersonStatus, PersonType, PersonUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::RequireApiKey;
use crate::inbound::http::envelope::{Envelope, PagedEnvelope};
use crate::inbound::http::state::HttpState;

/// A person as serialised to clients.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub id: i32,
    pub name: String,
    pub job_title: String,
    pub department: String,
    pub manager_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_path: Option<String>,
    pub person_type: PersonType,
    pub status: PersonStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
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
            created_at: person.created_at,
            updated_at: person.updated_at,
        }
    }
}

/// A person with their manager and direct reports.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetailResponse {
    #[serde(flatten)]
    pub person: PersonResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<PersonResponse>,
    pub direct_reports: Vec<PersonResponse>,
}

impl From<PersonDetail> for PersonDetailResponse {
    fn from(detail: PersonDetail) -> Self {
        Self {
            person: detail.person.into(),
            manager: detail.manager.map(Into::into),
            direct_reports: detail.direct_reports.into_iter().map(Into::into).collect(),
        }
    }
}

/// A manager with their direct-report headcount.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerResponse {
    #[serde(flatten)]
    pub person: PersonResponse,
    pub direct_reports: u64,
}

impl From<ManagerRecord> for ManagerResponse {
    fn from(record: ManagerRecord) -> Self {
        Self {
            person: record.person.into(),
            direct_reports: record.direct_reports,
        }
    }
}

/// Aggregate directory counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub total: u64,
    pub employees: u64,
    pub partners: u64,
    pub active: u64,
    pub inactive: u64,
    pub departments: Vec<DepartmentCountResponse>,
}

/// One department's headcount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DepartmentCountResponse {
    pub name: String,
    pub count: u64,
}

impl From<Statistics> for StatisticsResponse {
    fn from(stats: Statistics) -> Self {
        Self {
            total: stats.total,
            employees: stats.employees,
            partners: stats.partners,
            active: stats.active,
            inactive: stats.inactive,
            departments: stats
                .departments
                .into_iter()
                .map(|d| DepartmentCountResponse {
                    name: d.name,
                    count: d.count,
                })
                .collect(),
        }
    }
}

/// Body for `POST /api/v1/people`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonRequest {
    pub name: String,
    pub job_title: String,
    pub department: String,
    #[serde(default)]
    pub manager_id: Option<i32>,
    #[serde(default)]
    pub photo_path: Option<String>,
    #[serde(default)]
    pub person_type: Option<PersonType>,
    #[serde(default)]
    pub status: Option<PersonStatus>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
}

impl From<CreatePersonRequest> for NewPerson {
    fn from(body: CreatePersonRequest) -> Self {
        Self {
            name: body.name,
            job_title: body.job_title,
            department: body.department,
            manager_id: body.manager_id,
            photo_path: body.photo_path,
            person_type: body.person_type.unwrap_or_default(),
            status: body.status.unwrap_or_default(),
            email: body.email,
            phone: body.phone,
            location: body.location,
            hire_date: body.hire_date,
        }
    }
}

/// Distinguishes an absent JSON field from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Body for `PUT /api/v1/people/{id}`.
///
/// Omitted fields are untouched; nullable fields accept an explicit
/// `null` to clear the stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePersonRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>, nullable)]
    pub manager_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub photo_path: Option<Option<String>>,
    #[serde(default)]
    pub person_type: Option<PersonType>,
    #[serde(default)]
    pub status: Option<PersonStatus>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub hire_date: Option<Option<NaiveDate>>,
}

impl From<UpdatePersonRequest> for PersonUpdate {
    fn from(body: UpdatePersonRequest) -> Self {
        Self {
            name: body.name,
            job_title: body.job_title,
            department: body.department,
            manager_id: body.manager_id,
            photo_path: body.photo_path,
            person_type: body.person_type,
            status: body.status,
            email: body.email,
            phone: body.phone,
            location: body.location,
            hire_date: body.hire_date,
        }
    }
}

/// Query string for `GET /api/v1/people`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListPeopleQuery {
    /// Page number, starting at 1.
    pub page: Option<u32>,
    /// Page size, capped at 100.
    pub limit: Option<u32>,
    /// Case-insensitive substring over name, job title, and email.
    pub search: Option<String>,
    /// Exact department match.
    pub department: Option<String>,
    /// Manager id, or the literal `null` for people without a manager.
    pub manager_id: Option<String>,
    /// `Employee` or `Partner`.
    pub person_type: Option<String>,
    /// `Active` or `Inactive`.
    pub status: Option<String>,
    /// `name`, `jobTitle`, `department`, `createdAt`, or `updatedAt`.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
}

impl ListPeopleQuery {
    fn filter(&self) -> Result<PersonFilter, Error> {
        let manager_id = match self.manager_id.as_deref() {
            None => None,
            Some("null") => Some(None),
            Some(raw) => Some(Some(raw.parse::<i32>().map_err(|_| {
                Error::invalid_request(format!("managerId must be an integer or 'null', got '{raw}'"))
            })?)),
        };
        let person_type: Option<PersonType> = self
            .person_type
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|err| Error::invalid_request(format!("{err}")))?;
        let status: Option<PersonStatus> = self
            .status
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|err| Error::invalid_request(format!("{err}")))?;
        Ok(PersonFilter {
            search: self.search.clone().filter(|s| !s.trim().is_empty()),
            department: self.department.clone(),
            manager_id,
            person_type,
            status,
        })
    }

    fn sort(&self) -> Result<Option<PersonSort>, Error> {
        if self.sort_by.is_none() && self.sort_order.is_none() {
            return Ok(None);
        }
        let field: SortField = self
            .sort_by
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(Error::invalid_request)?
            .unwrap_or_default();
        let direction: SortDirection = self
            .sort_order
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(Error::invalid_request)?
            .unwrap_or_default();
        Ok(Some(PersonSort { field, direction }))
    }
}

/// List people with filtering, sorting, and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/people",
    params(ListPeopleQuery),
    responses(
        (status = 200, description = "One page of people", body = PagedEnvelope<PersonResponse>),
        (status = 400, description = "Invalid query", body = Error),
        (status = 401, description = "Missing or invalid API key", body = Error)
    ),
    tags = ["people"],
    operation_id = "listPeople"
)]
#[get("/people")]
pub async fn list_people(
    _auth: RequireApiKey,
    state: web::Data<HttpState>,
    query: web::Query<ListPeopleQuery>,
) -> ApiResult<web::Json<PagedEnvelope<PersonResponse>>> {
    let filter = query.filter()?;
    let sort = query.sort()?;
    let params = PageParams::clamped(query.page, query.limit);
    let page = state.directory.list(&filter, sort, params).await?;
    Ok(web::Json(PagedEnvelope::new(page.map(PersonResponse::from))))
}

/// Fetch one person with manager and direct reports.
#[utoipa::path(
    get,
    path = "/api/v1/people/{id}",
    params(("id" = i32, Path, description = "Person identifier")),
    responses(
        (status = 200, description = "The person", body = Envelope<PersonDetailResponse>),
        (status = 401, description = "Missing or invalid API key", body = Error),
        (status = 404, description = "No such person", body = Error)
    ),
    tags = ["people"],
    operation_id = "getPerson"
)]
#[get("/people/{id}")]
pub async fn get_person(
    _auth: RequireApiKey,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Envelope<PersonDetailResponse>>> {
    let detail = state.directory.get(path.into_inner()).await?;
    Ok(web::Json(Envelope::new(detail.into())))
}

/// Create a person.
#[utoipa::path(
    post,
    path = "/api/v1/people",
    request_body = CreatePersonRequest,
    responses(
        (status = 201, description = "Created", body = Envelope<PersonResponse>),
        (status = 400, description = "Invalid body", body = Error),
        (status = 401, description = "Missing or invalid API key", body = Error),
        (status = 404, description = "Referenced manager missing", body = Error)
    ),
    tags = ["people"],
    operation_id = "createPerson"
)]
#[post("/people")]
pub async fn create_person(
    _auth: RequireApiKey,
    state: web::Data<HttpState>,
    body: web::Json<CreatePersonRequest>,
) -> ApiResult<HttpResponse> {
    let person = state.directory.create(body.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(Envelope::new(PersonResponse::from(person))))
}

/// Update a person.
#[utoipa::path(
    put,
    path = "/api/v1/people/{id}",
    params(("id" = i32, Path, description = "Person identifier")),
    request_body = UpdatePersonRequest,
    responses(
        (status = 200, description = "Updated", body = Envelope<PersonResponse>),
        (status = 400, description = "Invalid body or circular manager assignment", body = Error),
        (status = 401, description = "Missing or invalid API key", body = Error),
        (status = 404, description = "No such person or manager", body = Error)
    ),
    tags = ["people"],
    operation_id = "updatePerson"
)]
#[put("/people/{id}")]
pub async fn update_person(
    _auth: RequireApiKey,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    body: web::Json<UpdatePersonRequest>,
) -> ApiResult<web::Json<Envelope<PersonResponse>>> {
    let person = state
        .directory
        .update(path.into_inner(), body.into_inner().into())
        .await?;
    Ok(web::Json(Envelope::new(PersonResponse::from(person))))
}

/// Delete a person, detaching their direct reports.
#[utoipa::path(
    delete,
    path = "/api/v1/people/{id}",
    params(("id" = i32, Path, description = "Person identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing or invalid API key", body = Error),
        (status = 404, description = "No such person", body = Error)
    ),
    tags = ["people"],
    operation_id = "deletePerson"
)]
#[delete("/people/{id}")]
pub async fn delete_person(
    _auth: RequireApiKey,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state.directory.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List distinct department names.
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "Department names", body = Envelope<Vec<String>>),
        (status = 401, description = "Missing or invalid API key", body = Error)
    ),
    tags = ["people"],
    operation_id = "listDepartments"
)]
#[get("/departments")]
pub async fn list_departments(
    _auth: RequireApiKey,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Envelope<Vec<String>>>> {
    let departments = state.directory.departments().await?;
    Ok(web::Json(Envelope::new(departments)))
}

/// List people who have direct reports.
#[utoipa::path(
    get,
    path = "/api/v1/managers",
    responses(
        (status = 200, description = "Managers with headcounts", body = Envelope<Vec<ManagerResponse>>),
        (status = 401, description = "Missing or invalid API key", body = Error)
    ),
    tags = ["people"],
    operation_id = "listManagers"
)]
#[get("/managers")]
pub async fn list_managers(
    _auth: RequireApiKey,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Envelope<Vec<ManagerResponse>>>> {
    let managers = state.directory.managers().await?;
    Ok(web::Json(Envelope::new(
        managers.into_iter().map(Into::into).collect(),
    )))
}

/// Aggregate directory statistics.
#[utoipa::path(
    get,
    path = "/api/v1/statistics",
    responses(
        (status = 200, description = "Directory counts", body = Envelope<StatisticsResponse>),
        (status = 401, description = "Missing or invalid API key", body = Error)
    ),
    tags = ["people"],
    operation_id = "getStatistics"
)]
#[get("/statistics")]
pub async fn statistics(
    _auth: RequireApiKey,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Envelope<StatisticsResponse>>> {
    let stats = state.directory.statistics().await?;
    Ok(web::Json(Envelope::new(stats.into())))
}

#[cfg(test)]
mod tests;
