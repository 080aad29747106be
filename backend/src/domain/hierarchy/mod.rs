//! Organisational tree construction, chain resolution, and search.
//!
//! The person table stores a parent pointer (`manager_id`) per row. This
//! module turns that flat representation into a tree, walks it upwards
//! to produce management chains, and ranks tree nodes against free-text
//! queries. All traversals are iterative and guarded against reference
//! cycles, which a parent-pointer encoding cannot rule out statically.

mod builder;
mod chain;
mod search;

pub use builder::{MAX_DEPTH, MAX_NODES, build_hierarchy};
pub use chain::resolve_management_chain;
pub use search::{MatchedField, SearchResult, search_hierarchy};

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::person::{PersonStatus, PersonType};
use crate::domain::ports::PersonRepositoryError;

/// Failures while building or traversing the organisational tree.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HierarchyError {
    /// The requested person does not exist.
    #[error("person {id} not found")]
    PersonNotFound {
        /// Identifier that failed to resolve.
        id: i32,
    },
    /// No person without a manager exists to act as the tree root.
    #[error("no root person found")]
    RootNotFound,
    /// A manager chain loops back on itself.
    #[error("management cycle detected at person {id}")]
    CycleDetected {
        /// First identifier seen twice during traversal.
        id: i32,
    },
    /// The tree is deeper than the traversal guard allows.
    #[error("hierarchy exceeds maximum depth of {limit}")]
    DepthExceeded {
        /// Depth guard that was hit.
        limit: usize,
    },
    /// The tree holds more nodes than the traversal guard allows.
    #[error("hierarchy exceeds maximum size of {limit} nodes")]
    TooManyNodes {
        /// Node-count guard that was hit.
        limit: usize,
    },
    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] PersonRepositoryError),
}

/// One person in the rendered organisational tree.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    /// Person identifier.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Job title.
    pub job_title: String,
    /// Department name.
    pub department: String,
    /// Photo path, if one is stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_path: Option<String>,
    /// Employee or partner.
    pub person_type: PersonType,
    /// Active or inactive.
    pub status: PersonStatus,
    /// Direct reports, sorted by name ascending.
    #[schema(no_recursion)]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Total number of nodes in this subtree, including the receiver.
    #[must_use]
    pub fn size(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }
}
