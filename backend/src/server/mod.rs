//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{InMemoryPersonRepository, PersonRepository};
use crate::domain::{CompositeEventSink, DirectoryService, TracingEventSink};
use crate::inbound::http::auth::ApiKeyPolicy;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::hierarchy::{get_hierarchy, management_chain, search_hierarchy};
use crate::inbound::http::people::{
    create_person, delete_person, get_person, list_departments, list_managers, list_people,
    statistics, update_person,
};
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;
use crate::outbound::persistence::{DbPool, DieselPersonRepository};

/// Choose the person store for the configured deployment.
///
/// With a pool the directory is PostgreSQL-backed; without one it runs
/// entirely in memory, which backs local development and tests.
#[must_use]
pub fn build_store(db_pool: Option<DbPool>) -> Arc<dyn PersonRepository> {
    match db_pool {
        Some(pool) => Arc::new(DieselPersonRepository::new(pool)),
        None => {
            info!("no database pool configured; using in-memory person store");
            Arc::new(InMemoryPersonRepository::new())
        }
    }
}

/// Wire the directory service with its event sinks.
#[must_use]
pub fn build_directory(store: Arc<dyn PersonRepository>) -> Arc<DirectoryService> {
    let events = CompositeEventSink::default().with_sink(Arc::new(TracingEventSink));
    Arc::new(DirectoryService::new(store, Arc::new(events)))
}

/// Assemble the application with every route and middleware attached.
pub fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
    api_key_policy: web::Data<ApiKeyPolicy>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .wrap(Trace)
        .app_data(http_state)
        .app_data(health_state)
        .app_data(api_key_policy)
        .service(
            web::scope("/api/v1")
                .service(live)
                .service(ready)
                .service(list_people)
                .service(create_person)
                .service(get_hierarchy)
                .service(search_hierarchy)
                .service(management_chain)
                .service(get_person)
                .service(update_person)
                .service(delete_person)
                .service(list_departments)
                .service(list_managers)
                .service(statistics),
        );

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app
}

/// Bind the HTTP server described by `config` over the given store.
///
/// # Errors
///
/// Returns an error when the listen address cannot be bound.
pub fn build_server(
    config: ServerConfig,
    store: Arc<dyn PersonRepository>,
    health_state: web::Data<HealthState>,
) -> std::io::Result<Server> {
    let directory = build_directory(store);
    let http_state = web::Data::new(HttpState::new(directory));
    let api_key_policy = web::Data::new(config.api_key_policy.clone());
    let server = HttpServer::new(move || {
        build_app(
            http_state.clone(),
            health_state.clone(),
            api_key_policy.clone(),
        )
    })
    .bind(config.bind_addr)?
    .run();
    Ok(server)
}
