//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API. It
//! registers every HTTP endpoint from the inbound layer, the response and
//! request schemas, and the `X-API-Key` security scheme. The generated
//! specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::hierarchy::{HierarchyNode, MatchedField, SearchResult};
use crate::domain::person::{PersonStatus, PersonType};
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::people::{
    CreatePersonRequest, DepartmentCountResponse, ManagerResponse, PersonDetailResponse,
    PersonResponse, StatisticsResponse, UpdatePersonRequest,
};
use pagination::PageMeta;

/// Enrich the generated document with the API key security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "ApiKey",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-API-Key",
                "Static API key required on every endpoint except health probes.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Organizational directory API",
        description = "HTTP interface for browsing and maintaining an organizational directory."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("ApiKey" = [])),
    paths(
        crate::inbound::http::people::list_people,
        crate::inbound::http::people::create_person,
        crate::inbound::http::people::get_person,
        crate::inbound::http::people::update_person,
        crate::inbound::http::people::delete_person,
        crate::inbound::http::people::list_departments,
        crate::inbound::http::people::list_managers,
        crate::inbound::http::people::statistics,
        crate::inbound::http::hierarchy::get_hierarchy,
        crate::inbound::http::hierarchy::search_hierarchy,
        crate::inbound::http::hierarchy::management_chain,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PersonType,
        PersonStatus,
        PersonResponse,
        PersonDetailResponse,
        ManagerResponse,
        StatisticsResponse,
        DepartmentCountResponse,
        CreatePersonRequest,
        UpdatePersonRequest,
        HierarchyNode,
        SearchResult,
        MatchedField,
        PageMeta,
    )),
    tags(
        (name = "people", description = "Person records, departments, and statistics"),
        (name = "hierarchy", description = "Reporting tree, search, and management chains"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
