//! PostgreSQL persistence adapters built on Diesel.

mod diesel_person_repository;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_person_repository::DieselPersonRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
