//! Upward traversal from a person to the top of the organisation.

use std::collections::HashSet;

use super::{HierarchyError, MAX_DEPTH};
use crate::domain::person::Person;
use crate::domain::ports::PersonRepository;

/// Resolve the management chain for one person.
///
/// The chain is ordered nearest manager first and excludes the person
/// it starts from. A person who names themselves as their own manager
/// gets an empty chain; any longer loop is reported as
/// [`HierarchyError::CycleDetected`]. A manager id that no longer
/// resolves ends the walk with whatever was gathered so far.
pub async fn resolve_management_chain(
    store: &dyn PersonRepository,
    person_id: i32,
) -> Result<Vec<Person>, HierarchyError> {
    let start = store
        .find_by_id(person_id)
        .await?
        .ok_or(HierarchyError::PersonNotFound { id: person_id })?;

    let mut chain = Vec::new();
    let mut visited: HashSet<i32> = HashSet::from([person_id]);
    let mut cursor = start.manager_id;

    while let Some(manager_id) = cursor {
        // A direct self-pointer means "no manager", not a broken chain.
        if manager_id == person_id && chain.is_empty() {
            break;
        }
        if !visited.insert(manager_id) {
            return Err(HierarchyError::CycleDetected { id: manager_id });
        }
        if chain.len() >= MAX_DEPTH {
            return Err(HierarchyError::DepthExceeded { limit: MAX_DEPTH });
        }
        // Dangling manager ids end the walk rather than failing it.
        let Some(manager) = store.find_by_id(manager_id).await? else {
            break;
        };
        cursor = manager.manager_id;
        chain.push(manager);
    }

    Ok(chain)
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
