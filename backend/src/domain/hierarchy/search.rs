//! Ranked free-text search over a rendered organisational tree.

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use utoipa::ToSchema;

use super::HierarchyNode;

/// Which field of a person a query matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum MatchedField {
    /// The display name matched.
    #[serde(rename = "name")]
    Name,
    /// The job title matched.
    #[serde(rename = "jobTitle")]
    JobTitle,
    /// The department matched.
    #[serde(rename = "department")]
    Department,
}

/// One scored hit from a hierarchy search.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
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
    /// Relevance score; higher is better.
    pub score: u32,
    /// Fields that contributed to the score.
    pub matched_fields: Vec<MatchedField>,
}

/// Fold case and strip diacritics so "José" matches "jose".
fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// True when every query token is a prefix of some word of `target`.
fn matches_words(target: &str, tokens: &[&str]) -> bool {
    let words: Vec<&str> = target.split_whitespace().collect();
    !words.is_empty()
        && !tokens.is_empty()
        && tokens
            .iter()
            .all(|token| words.iter().any(|word| word.starts_with(token)))
}

/// Score a name against the query.
///
/// Exact match scores 100, a raw prefix 80. Failing those, a name where
/// every query token is a prefix of some word scores 60 plus 10 per
/// token that equals a word outright. Anything else scores 0.
fn score_name(name: &str, query: &str, tokens: &[&str]) -> u32 {
    if name == query {
        return 100;
    }
    if name.starts_with(query) {
        return 80;
    }
    if !matches_words(name, tokens) {
        return 0;
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    let exact_words = tokens
        .iter()
        .filter(|token| words.iter().any(|word| word == *token))
        .count() as u32;
    60 + 10 * exact_words
}

fn score_node(node: &HierarchyNode, query: &str, tokens: &[&str]) -> Option<SearchResult> {
    let mut score = 0;
    let mut matched_fields = Vec::new();

    let name_score = score_name(&normalize(&node.name), query, tokens);
    if name_score > 0 {
        score += name_score;
        matched_fields.push(MatchedField::Name);
    }
    if matches_words(&normalize(&node.job_title), tokens) {
        score += 30;
        matched_fields.push(MatchedField::JobTitle);
    }
    if matches_words(&normalize(&node.department), tokens) {
        score += 20;
        matched_fields.push(MatchedField::Department);
    }

    (score > 0).then(|| SearchResult {
        id: node.id,
        name: node.name.clone(),
        job_title: node.job_title.clone(),
        department: node.department.clone(),
        photo_path: node.photo_path.clone(),
        score,
        matched_fields,
    })
}

/// Search every node of `tree` for `query`.
///
/// Results are ordered by score descending; equal scores keep the
/// tree's preorder, so ties resolve towards the top of the
/// organisation. A blank query yields no results.
#[must_use]
pub fn search_hierarchy(tree: &HierarchyNode, query: &str) -> Vec<SearchResult> {
    let query = normalize(query.trim());
    if query.is_empty() {
        return Vec::new();
    }
    let tokens: Vec<&str> = query.split_whitespace().collect();

    let mut results = Vec::new();
    let mut stack = vec![tree];
    while let Some(node) = stack.pop() {
        if let Some(result) = score_node(node, &query, &tokens) {
            results.push(result);
        }
        // Reversed push keeps the walk in preorder.
        stack.extend(node.children.iter().rev());
    }

    // Stable sort preserves preorder among equal scores.
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
