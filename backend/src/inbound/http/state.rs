//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they depend only
//! on the domain service and stay testable without a database.

use std::sync::Arc;

use crate::domain::DirectoryService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// The directory application service.
    pub directory: Arc<DirectoryService>,
}

impl HttpState {
    /// Bundle the directory service for handler injection.
    #[must_use]
    pub fn new(directory: Arc<DirectoryService>) -> Self {
        Self { directory }
    }
}
