use serde_json::Value;

use crate::model::section::{MAX_DEPTH, Section};
use crate::model::status::{Status, StatusRegistry, pastel_color};
use crate::model::tree::SectionTree;
use crate::model::workspace::Workspace;
use crate::ops::aggregate::aggregate;

/// Error type for import validation and decoding
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("expected a JSON array of sections")]
    NotAnArray,
    #[error("invalid section at {path}: {reason}")]
    InvalidSection { path: String, reason: String },
    #[error("sections nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,
    #[error("invalid sections: {0}")]
    Decode(#[from] serde_json::Error),
}

fn invalid(path: &str, reason: &str) -> NormalizeError {
    NormalizeError::InvalidSection {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check that `value` is an array of section-shaped objects before
/// anything else looks at it. Unknown fields are allowed (and dropped
/// later); wrong-typed known fields and over-deep nesting are not.
pub fn validate(value: &Value) -> Result<(), NormalizeError> {
    let Some(items) = value.as_array() else {
        return Err(NormalizeError::NotAnArray);
    };
    for (i, item) in items.iter().enumerate() {
        validate_section(item, &format!("[{i}]"), 0)?;
    }
    Ok(())
}

fn validate_section(value: &Value, path: &str, depth: usize) -> Result<(), NormalizeError> {
    if depth >= MAX_DEPTH {
        return Err(NormalizeError::TooDeep);
    }
    let Some(obj) = value.as_object() else {
        return Err(invalid(path, "not an object"));
    };
    if obj.contains_key("key") && obj.contains_key("path") {
        return Err(invalid(path, "has both `key` and `path`"));
    }
    match obj.get("key").or_else(|| obj.get("path")) {
        Some(Value::String(_)) => {}
        Some(_) => return Err(invalid(path, "`key` must be a string")),
        None => return Err(invalid(path, "missing `key`")),
    }
    match obj.get("name") {
        Some(Value::String(_)) => {}
        Some(_) => return Err(invalid(path, "`name` must be a string")),
        None => return Err(invalid(path, "missing `name`")),
    }
    if let Some(status) = obj.get("status") {
        if !status.is_string() {
            return Err(invalid(path, "`status` must be a string"));
        }
    }
    if let Some(collapsed) = obj.get("isCollapsed") {
        if !collapsed.is_boolean() {
            return Err(invalid(path, "`isCollapsed` must be a boolean"));
        }
    }
    if let Some(children) = obj.get("children") {
        let Some(items) = children.as_array() else {
            return Err(invalid(path, "`children` must be an array"));
        };
        for (i, child) in items.iter().enumerate() {
            validate_section(child, &format!("{path}.children[{i}]"), depth + 1)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Normalize raw JSON into a canonical tree and registry.
///
/// Validates, decodes into owned sections (dropping unrecognized
/// fields, accepting `path` for `key`), then runs the typed pipeline.
/// Nothing outside the return value is touched, so a failure leaves
/// the caller's state exactly as it was.
pub fn normalize(
    value: &Value,
    registry: &StatusRegistry,
    previous: &SectionTree,
) -> Result<(SectionTree, StatusRegistry), NormalizeError> {
    validate(value)?;
    let sections: Vec<Section> = serde_json::from_value(value.clone())?;
    Ok(normalize_sections(sections, registry, previous))
}

/// The typed pipeline over already-decoded sections:
/// extract statuses, adopt them, backfill from `previous`, aggregate.
///
/// Extraction walks pre-order collecting each distinct non-empty status
/// once; a name already in `registry` keeps its color, anything new
/// takes the next pastel palette color. If the import carried any
/// statuses at all they replace the registry wholesale, dropping
/// entries the import does not mention. Loading data can therefore
/// silently redefine the whole status vocabulary; that matches how
/// imports have always behaved and callers rely on it.
pub fn normalize_sections(
    sections: Vec<Section>,
    registry: &StatusRegistry,
    previous: &SectionTree,
) -> (SectionTree, StatusRegistry) {
    let extracted = extract_statuses(&sections, registry);
    let registry = if extracted.is_empty() {
        registry.clone()
    } else {
        StatusRegistry::from_statuses(extracted)
    };

    let mut tree = SectionTree::from_roots(sections);
    backfill(&mut tree.roots, previous, &registry);
    aggregate(&mut tree, &registry);
    (tree, registry)
}

fn extract_statuses(sections: &[Section], registry: &StatusRegistry) -> Vec<Status> {
    let mut found: Vec<Status> = Vec::new();
    let mut palette_used = 0;
    collect_statuses(sections, registry, &mut found, &mut palette_used);
    found
}

fn collect_statuses(
    sections: &[Section],
    registry: &StatusRegistry,
    found: &mut Vec<Status>,
    palette_used: &mut usize,
) {
    for section in sections {
        if !section.status.is_empty() && !found.iter().any(|s| s.name == section.status) {
            let color = match registry.color(&section.status) {
                Some(color) => color.to_string(),
                None => {
                    let color = pastel_color(*palette_used);
                    *palette_used += 1;
                    color.to_string()
                }
            };
            found.push(Status::new(section.status.clone(), color));
        }
        collect_statuses(&section.children, registry, found, palette_used);
    }
}

/// Give every status-less node a status: the one its key had in
/// `previous` if the key existed there (even when that was empty),
/// otherwise the registry's least advanced name.
fn backfill(sections: &mut [Section], previous: &SectionTree, registry: &StatusRegistry) {
    for section in sections {
        if section.status.is_empty() {
            section.status = match previous.lookup(&section.key) {
                Some(prior) => prior.status.clone(),
                None => registry.first_name().unwrap_or("").to_string(),
            };
        }
        backfill(&mut section.children, previous, registry);
    }
}

// ---------------------------------------------------------------------------
// Workspace entry points
// ---------------------------------------------------------------------------

/// Run the import pipeline against the live workspace and commit the
/// result. All-or-nothing: a validation failure changes nothing.
pub fn load_sections(ws: &mut Workspace, value: &Value) -> Result<(), NormalizeError> {
    let (tree, registry) = normalize(value, &ws.statuses, &ws.sections)?;
    commit(ws, tree, registry);
    Ok(())
}

/// Make `project_id` current and run its stored sections through the
/// pipeline, letting same-keyed nodes inherit statuses from the
/// outgoing tree. False if the project does not exist.
pub fn switch_project(ws: &mut Workspace, project_id: &str) -> bool {
    let Some(project) = ws.project_by_id(project_id) else {
        return false;
    };
    let sections = project.sections.roots.clone();
    ws.current_project_id = Some(project_id.to_string());
    let (tree, registry) = normalize_sections(sections, &ws.statuses, &ws.sections);
    commit(ws, tree, registry);
    true
}

fn commit(ws: &mut Workspace, tree: SectionTree, registry: StatusRegistry) {
    ws.sections = tree;
    ws.statuses = registry;
    ws.sync_current();
    ws.bump_generation();
}
