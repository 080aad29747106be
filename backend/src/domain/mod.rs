//! Core domain model for the organisational directory.
//!
//! Everything in this module is transport- and storage-agnostic: the
//! HTTP layer consumes it through [`DirectoryService`] and storage is
//! reached only through the traits in [`ports`].

pub mod directory_service;
pub mod error;
pub mod events;
pub mod hierarchy;
pub mod person;
pub mod ports;

pub use directory_service::{DirectoryService, PersonDetail, Statistics};
pub use error::{Error, ErrorCode};
pub use events::{CompositeEventSink, EventSink, PersonEvent, PersonEventKind, TracingEventSink};
pub use hierarchy::{HierarchyNode, MatchedField, SearchResult};
pub use person::{NewPerson, Person, PersonStatus, PersonType, PersonUpdate};

/// Result alias for operations that fail with the domain [`Error`].
pub type ApiResult<T> = Result<T, Error>;
