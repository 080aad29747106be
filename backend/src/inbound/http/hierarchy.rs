//! Hierarchy API handlers.
//!
//! ```text
//! GET /api/v1/hierarchy?rootId=3
//! GET /api/v1/hierarchy/search?q=engineer&rootId=3
//! GET /api/v1/people/42/management-chain
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, HierarchyNode, SearchResult};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::RequireApiKey;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::people::PersonResponse;
use crate::inbound::http::state::HttpState;

/// Query string for `GET /api/v1/hierarchy`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyQuery {
    /// Person to treat as the tree root; defaults to the organisation head.
    pub root_id: Option<i32>,
}

/// Query string for `GET /api/v1/hierarchy/search`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct HierarchySearchQuery {
    /// Free-text query.
    pub q: Option<String>,
    /// Person to scope the search under; defaults to the organisation head.
    pub root_id: Option<i32>,
}

/// Render the organisational tree.
#[utoipa::path(
    get,
    path = "/api/v1/hierarchy",
    params(HierarchyQuery),
    responses(
        (status = 200, description = "The organisational tree", body = Envelope<HierarchyNode>),
        (status = 401, description = "Missing or invalid API key", body = Error),
        (status = 404, description = "Requested root missing", body = Error),
        (status = 500, description = "Stored data contains a cycle", body = Error)
    ),
    tags = ["hierarchy"],
    operation_id = "getHierarchy"
)]
#[get("/hierarchy")]
pub async fn get_hierarchy(
    _auth: RequireApiKey,
    state: web::Data<HttpState>,
    query: web::Query<HierarchyQuery>,
) -> ApiResult<web::Json<Envelope<HierarchyNode>>> {
    let tree = state.directory.hierarchy(query.root_id).await?;
    Ok(web::Json(Envelope::new(tree)))
}

/// Search the organisational tree.
#[utoipa::path(
    get,
    path = "/api/v1/hierarchy/search",
    params(HierarchySearchQuery),
    responses(
        (status = 200, description = "Scored search results", body = Envelope<Vec<SearchResult>>),
        (status = 400, description = "Missing query", body = Error),
        (status = 401, description = "Missing or invalid API key", body = Error),
        (status = 404, description = "Requested root missing", body = Error)
    ),
    tags = ["hierarchy"],
    operation_id = "searchHierarchy"
)]
#[get("/hierarchy/search")]
pub async fn search_hierarchy(
    _auth: RequireApiKey,
    state: web::Data<HttpState>,
    query: web::Query<HierarchySearchQuery>,
) -> ApiResult<web::Json<Envelope<Vec<SearchResult>>>> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| Error::invalid_request("query parameter 'q' is required"))?;
    let results = state.directory.search(query.root_id, q).await?;
    Ok(web::Json(Envelope::new(results)))
}

/// Resolve a person's management chain, nearest manager first.
#[utoipa::path(
    get,
    path = "/api/v1/people/{id}/management-chain",
    params(("id" = i32, Path, description = "Person identifier")),
    responses(
        (status = 200, description = "Managers above the person", body = Envelope<Vec<PersonResponse>>),
        (status = 401, description = "Missing or invalid API key", body = Error),
        (status = 404, description = "No such person", body = Error),
        (status = 500, description = "Stored data contains a cycle", body = Error)
    ),
    tags = ["hierarchy"],
    operation_id = "getManagementChain"
)]
#[get("/people/{id}/management-chain")]
pub async fn management_chain(
    _auth: RequireApiKey,
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Envelope<Vec<PersonResponse>>>> {
    let chain = state.directory.management_chain(path.into_inner()).await?;
    Ok(web::Json(Envelope::new(
        chain.into_iter().map(Into::into).collect(),
    )))
}
