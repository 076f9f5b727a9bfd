use indexmap::IndexMap;
use serde::Serialize;

use crate::model::status::StatusRegistry;
use crate::model::tree::SectionTree;

/// Structured result from `cn check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A validation error (something that breaks lookups or mutations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// The same key appears on more than one section
    #[serde(rename = "duplicate_key")]
    DuplicateKey { key: String, count: usize },
    /// A child section has no entry in the parent index
    #[serde(rename = "missing_index_entry")]
    MissingIndexEntry { key: String, parent: String },
    /// The parent index points a key at the wrong parent
    #[serde(rename = "wrong_index_parent")]
    WrongIndexParent {
        key: String,
        expected: String,
        actual: String,
    },
    /// The parent index has an entry for a key that is not a child anywhere
    #[serde(rename = "stale_index_entry")]
    StaleIndexEntry { key: String, parent: String },
}

/// A validation warning (non-critical issue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// The same display name appears on more than one section
    #[serde(rename = "duplicate_name")]
    DuplicateName { name: String, count: usize },
    /// A section carries a status the registry does not define
    #[serde(rename = "unknown_status")]
    UnknownStatus { key: String, status: String },
}

/// Run all checks over a tree and its registry.
pub fn check_tree(tree: &SectionTree, registry: &StatusRegistry) -> CheckResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    check_duplicate_keys(tree, &mut errors);
    check_index(tree, &mut errors);
    check_duplicate_names(tree, &mut warnings);
    check_statuses(tree, registry, &mut warnings);

    CheckResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// 1. Duplicate keys
// ---------------------------------------------------------------------------

fn check_duplicate_keys(tree: &SectionTree, errors: &mut Vec<CheckError>) {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for (section, _) in tree.iter() {
        *counts.entry(section.key.as_str()).or_insert(0) += 1;
    }
    for (key, count) in counts {
        if count > 1 {
            errors.push(CheckError::DuplicateKey {
                key: key.to_string(),
                count,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Parent index consistency
// ---------------------------------------------------------------------------

/// Compare the live index against one rebuilt from the roots. Any
/// difference means a mutation forgot to keep the index in step.
fn check_index(tree: &SectionTree, errors: &mut Vec<CheckError>) {
    let rebuilt = SectionTree::from_roots(tree.roots.clone());

    for (key, parent) in &rebuilt.index {
        match tree.index.get(key) {
            None => errors.push(CheckError::MissingIndexEntry {
                key: key.clone(),
                parent: parent.clone(),
            }),
            Some(actual) if actual != parent => errors.push(CheckError::WrongIndexParent {
                key: key.clone(),
                expected: parent.clone(),
                actual: actual.clone(),
            }),
            Some(_) => {}
        }
    }

    for (key, parent) in &tree.index {
        if !rebuilt.index.contains_key(key) {
            errors.push(CheckError::StaleIndexEntry {
                key: key.clone(),
                parent: parent.clone(),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Duplicate names
// ---------------------------------------------------------------------------

fn check_duplicate_names(tree: &SectionTree, warnings: &mut Vec<CheckWarning>) {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for (section, _) in tree.iter() {
        *counts.entry(section.name.as_str()).or_insert(0) += 1;
    }
    for (name, count) in counts {
        if count > 1 {
            warnings.push(CheckWarning::DuplicateName {
                name: name.to_string(),
                count,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Status references
// ---------------------------------------------------------------------------

fn check_statuses(tree: &SectionTree, registry: &StatusRegistry, warnings: &mut Vec<CheckWarning>) {
    for (section, _) in tree.iter() {
        if !section.status.is_empty() && !registry.contains(&section.status) {
            warnings.push(CheckWarning::UnknownStatus {
                key: section.key.clone(),
                status: section.status.clone(),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
