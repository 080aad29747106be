//! Backend library modules for the organizational directory service.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(feature = "example-data")]
pub mod seeding;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware, re-exported for embedding applications.
pub use middleware::Trace;
