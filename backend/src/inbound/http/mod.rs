//! HTTP inbound adapter exposing the directory REST endpoints.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod health;
pub mod hierarchy;
pub mod people;
pub mod state;

pub use crate::domain::ApiResult;
