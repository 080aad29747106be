//! Diesel-backed implementation of the person repository port.

use std::collections::BTreeMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::PageParams;

use super::models::{NewPersonRow, PersonChangeset, PersonRow};
use super::pool::{DbPool, PoolError};
use super::schema::people;
use crate::domain::person::{NewPerson, Person, PersonUpdate};
use crate::domain::ports::{
    DepartmentCount, ManagerRecord, PersonFilter, PersonRepository, PersonRepositoryError,
    PersonSort, SortDirection, SortField,
};

fn map_pool_error(err: PoolError) -> PersonRepositoryError {
    PersonRepositoryError::connection(err.to_string())
}

fn map_diesel_error(err: diesel::result::Error) -> PersonRepositoryError {
    PersonRepositoryError::query(err.to_string())
}

/// Build a boxed query with the filter's predicates applied.
fn filtered(filter: &PersonFilter) -> people::BoxedQuery<'static, Pg> {
    let mut query = people::table.into_boxed();
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        query = query.filter(
            people::name
                .ilike(pattern.clone())
                .or(people::job_title.ilike(pattern.clone()))
                .or(people::email.ilike(pattern).assume_not_null()),
        );
    }
    if let Some(department) = &filter.department {
        query = query.filter(people::department.eq(department.clone()));
    }
    match filter.manager_id {
        Some(Some(manager_id)) => query = query.filter(people::manager_id.eq(manager_id)),
        Some(None) => query = query.filter(people::manager_id.is_null()),
        None => {}
    }
    if let Some(person_type) = filter.person_type {
        query = query.filter(people::person_type.eq(person_type.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(people::status.eq(status.as_str()));
    }
    query
}

fn sorted(
    query: people::BoxedQuery<'static, Pg>,
    sort: PersonSort,
) -> people::BoxedQuery<'static, Pg> {
    let ascending = sort.direction == SortDirection::Asc;
    let query = match (sort.field, ascending) {
        (SortField::Name, true) => query.order(people::name.asc()),
        (SortField::Name, false) => query.order(people::name.desc()),
        (SortField::JobTitle, true) => query.order(people::job_title.asc()),
        (SortField::JobTitle, false) => query.order(people::job_title.desc()),
        (SortField::Department, true) => query.order(people::department.asc()),
        (SortField::Department, false) => query.order(people::department.desc()),
        (SortField::CreatedAt, true) => query.order(people::created_at.asc()),
        (SortField::CreatedAt, false) => query.order(people::created_at.desc()),
        (SortField::UpdatedAt, true) => query.order(people::updated_at.asc()),
        (SortField::UpdatedAt, false) => query.order(people::updated_at.desc()),
    };
    // Deterministic order for rows that tie on the sort column.
    query.then_order_by(people::id.asc())
}

/// Person repository backed by the PostgreSQL `people` table.
#[derive(Clone)]
pub struct DieselPersonRepository {
    pool: DbPool,
}

impl DieselPersonRepository {
    /// Create a repository over the given pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonRepository for DieselPersonRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Person>, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = people::table
            .find(id)
            .first::<PersonRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Person::from))
    }

    async fn find_direct_reports(&self, id: i32) -> Result<Vec<Person>, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = people::table
            .filter(people::manager_id.eq(id))
            .order((people::name.asc(), people::id.asc()))
            .load::<PersonRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Person::from).collect())
    }

    async fn find_root(&self) -> Result<Option<Person>, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = people::table
            .filter(people::manager_id.is_null())
            .order((people::name.asc(), people::id.asc()))
            .first::<PersonRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Person::from))
    }

    async fn list(
        &self,
        filter: &PersonFilter,
        sort: Option<PersonSort>,
        page: PageParams,
    ) -> Result<(Vec<Person>, u64), PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows = sorted(filtered(filter), sort.unwrap_or_default())
            .offset(offset)
            .limit(i64::from(page.limit()))
            .load::<PersonRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let people = rows.into_iter().map(Person::from).collect();
        Ok((people, total.try_into().unwrap_or_default()))
    }

    async fn exists(&self, id: i32) -> Result<bool, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(people::table.find(id)))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn count(&self, filter: &PersonFilter) -> Result<u64, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(total.try_into().unwrap_or_default())
    }

    async fn departments(&self) -> Result<Vec<String>, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        people::table
            .select(people::department)
            .distinct()
            .order(people::department.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn department_counts(&self) -> Result<Vec<DepartmentCount>, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(String, i64)> = people::table
            .group_by(people::department)
            .select((people::department, count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let mut counts: Vec<DepartmentCount> = rows
            .into_iter()
            .map(|(name, count)| DepartmentCount {
                name,
                count: count.try_into().unwrap_or_default(),
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        Ok(counts)
    }

    async fn managers(&self) -> Result<Vec<ManagerRecord>, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let counts: Vec<(Option<i32>, i64)> = people::table
            .filter(people::manager_id.is_not_null())
            .group_by(people::manager_id)
            .select((people::manager_id, count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let by_manager: BTreeMap<i32, u64> = counts
            .into_iter()
            .filter_map(|(id, count)| Some((id?, count.try_into().ok()?)))
            .collect();

        let rows = people::table
            .filter(people::id.eq_any(by_manager.keys().copied().collect::<Vec<_>>()))
            .order((people::name.asc(), people::id.asc()))
            .load::<PersonRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let direct_reports = *by_manager.get(&row.id)?;
                Some(ManagerRecord {
                    person: row.into(),
                    direct_reports,
                })
            })
            .collect())
    }

    async fn create(&self, person: NewPerson) -> Result<Person, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(people::table)
            .values(NewPersonRow::from(person))
            .get_result::<PersonRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn update(&self, id: i32, update: PersonUpdate) -> Result<Person, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let result = diesel::update(people::table.find(id))
            .set(PersonChangeset::from(update))
            .get_result::<PersonRow>(&mut conn)
            .await;
        match result {
            Ok(row) => Ok(row.into()),
            Err(diesel::result::Error::NotFound) => Err(PersonRepositoryError::not_found(id)),
            Err(err) => Err(map_diesel_error(err)),
        }
    }

    async fn delete(&self, id: i32) -> Result<(), PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Detach direct reports and remove the person atomically so a
        // crash cannot orphan reports against a deleted manager.
        let deleted = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    diesel::update(people::table.filter(people::manager_id.eq(id)))
                        .set(people::manager_id.eq(None::<i32>))
                        .execute(conn)
                        .await?;
                    diesel::delete(people::table.find(id)).execute(conn).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(PersonRepositoryError::not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::person::{PersonStatus, PersonType};
    use rstest::rstest;

    fn sql(filter: &PersonFilter) -> String {
        diesel::debug_query::<Pg, _>(&filtered(filter)).to_string()
    }

    #[rstest]
    #[case::search(
        PersonFilter { search: Some("ada".to_owned()), ..PersonFilter::default() },
        "ILIKE",
    )]
    #[case::roots(
        PersonFilter { manager_id: Some(None), ..PersonFilter::default() },
        "\"manager_id\" IS NULL",
    )]
    #[case::person_type(
        PersonFilter { person_type: Some(PersonType::Partner), ..PersonFilter::default() },
        "\"person_type\" = ",
    )]
    #[case::status(
        PersonFilter { status: Some(PersonStatus::Inactive), ..PersonFilter::default() },
        "\"status\" = ",
    )]
    fn filters_emit_expected_predicates(#[case] filter: PersonFilter, #[case] fragment: &str) {
        assert!(
            sql(&filter).contains(fragment),
            "expected {fragment:?} in {}",
            sql(&filter)
        );
    }

    #[test]
    fn search_matches_name_title_and_email() {
        let query = sql(&PersonFilter {
            search: Some("ada".to_owned()),
            ..PersonFilter::default()
        });
        for column in ["\"name\"", "\"job_title\"", "\"email\""] {
            assert!(query.contains(column), "expected {column} in {query}");
        }
    }

    #[test]
    fn sort_appends_id_tiebreak() {
        let query = sorted(
            filtered(&PersonFilter::default()),
            PersonSort {
                field: SortField::Department,
                direction: SortDirection::Desc,
            },
        );
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"department\" DESC"));
        assert!(sql.contains("\"id\" ASC"));
    }
}
