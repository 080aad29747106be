//! Outbound ports for the directory domain.
//!
//! Ports are the seams between domain logic and infrastructure. The
//! domain depends only on these traits; adapters under
//! [`crate::outbound`] provide the production implementations and the
//! in-memory variants back tests and database-free deployments.

mod person_repository;

pub use person_repository::{
    DepartmentCount, InMemoryPersonRepository, ManagerRecord, PersonFilter, PersonRepository,
    PersonRepositoryError, PersonSort, SortDirection, SortField,
};

#[cfg(test)]
pub use person_repository::MockPersonRepository;
