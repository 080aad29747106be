//! Tree construction from the flat parent-pointer table.

use std::collections::HashSet;

use super::{HierarchyError, HierarchyNode};
use crate::domain::person::Person;
use crate::domain::ports::PersonRepository;

/// Maximum tree depth the builder will traverse.
pub const MAX_DEPTH: usize = 64;

/// Maximum number of nodes the builder will materialise.
pub const MAX_NODES: usize = 10_000;

fn shell(person: &Person) -> HierarchyNode {
    HierarchyNode {
        id: person.id,
        name: person.name.clone(),
        job_title: person.job_title.clone(),
        department: person.department.clone(),
        photo_path: person.photo_path.clone(),
        person_type: person.person_type,
        status: person.status,
        children: Vec::new(),
    }
}

/// Build the organisational tree rooted at `root_id`.
///
/// When `root_id` is `None` the first person without a manager (by name,
/// then id) becomes the root. Children appear in ascending name order.
/// Traversal is iterative; a visited set turns reference cycles into
/// [`HierarchyError::CycleDetected`] instead of livelock, and the
/// [`MAX_DEPTH`] and [`MAX_NODES`] guards bound pathological data.
pub async fn build_hierarchy(
    store: &dyn PersonRepository,
    root_id: Option<i32>,
) -> Result<HierarchyNode, HierarchyError> {
    let root = match root_id {
        Some(id) => store
            .find_by_id(id)
            .await?
            .ok_or(HierarchyError::PersonNotFound { id })?,
        None => store
            .find_root()
            .await?
            .ok_or(HierarchyError::RootNotFound)?,
    };

    // Preorder shells plus parent indices; assembled bottom-up afterwards.
    let mut nodes: Vec<HierarchyNode> = Vec::new();
    let mut parents: Vec<Option<usize>> = Vec::new();
    let mut visited: HashSet<i32> = HashSet::new();
    let mut stack: Vec<(Person, Option<usize>, usize)> = vec![(root, None, 0)];

    while let Some((person, parent, depth)) = stack.pop() {
        if depth > MAX_DEPTH {
            return Err(HierarchyError::DepthExceeded { limit: MAX_DEPTH });
        }
        if !visited.insert(person.id) {
            return Err(HierarchyError::CycleDetected { id: person.id });
        }
        if nodes.len() >= MAX_NODES {
            return Err(HierarchyError::TooManyNodes { limit: MAX_NODES });
        }
        let index = nodes.len();
        nodes.push(shell(&person));
        parents.push(parent);

        // Store ordering is not guaranteed; sort here so children always
        // come out name-ascending. Reversed push keeps preorder visiting
        // them in that order.
        let mut reports = store.find_direct_reports(person.id).await?;
        reports.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        for report in reports.into_iter().rev() {
            stack.push((report, Some(index), depth + 1));
        }
    }

    // Popping walks reverse preorder, so every node is finalised before
    // its parent. Children were attached back-to-front and need one
    // reversal each.
    while let Some(mut node) = nodes.pop() {
        node.children.reverse();
        match parents[nodes.len()] {
            Some(parent) => nodes[parent].children.push(node),
            None => return Ok(node),
        }
    }

    // The pop loop always terminates at the root's `None` parent.
    Err(HierarchyError::RootNotFound)
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
