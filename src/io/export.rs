use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::model::project::Project;
use crate::model::status::StatusRegistry;
use crate::model::tree::SectionTree;

/// Error type for import parsing
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("not valid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("expected a JSON array of sections or an object with a \"sections\" field")]
    UnrecognizedShape,
}

/// On-disk export shape: the project fields plus the status palette.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectExport<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub sections: &'a SectionTree,
    pub created_at: &'a DateTime<Utc>,
    pub statuses: &'a StatusRegistry,
}

/// Bundle a project with the palette for export.
pub fn export_project<'a>(project: &'a Project, statuses: &'a StatusRegistry) -> ProjectExport<'a> {
    ProjectExport {
        id: &project.id,
        name: &project.name,
        sections: &project.sections,
        created_at: &project.created_at,
        statuses,
    }
}

/// Default export filename: `{name}-{ISO-8601}.json`
pub fn export_filename(name: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}.json",
        name,
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// A parsed import: either a bare section array or a project export.
#[derive(Debug)]
pub enum ImportPayload {
    /// A bare JSON array of sections
    Sections(Value),
    /// A project object: raw sections plus optional name and statuses
    Project {
        name: Option<String>,
        sections: Value,
        statuses: Option<StatusRegistry>,
    },
}

impl ImportPayload {
    /// The raw sections value, whichever shape carried it
    pub fn sections(&self) -> &Value {
        match self {
            ImportPayload::Sections(v) => v,
            ImportPayload::Project { sections, .. } => sections,
        }
    }
}

/// Parse import text. Accepts both shapes `cn export` writes: a full
/// project object and a bare sections array. The statuses field may be
/// an array or an object keyed by stringified indexes (older exports).
pub fn parse_import(text: &str) -> Result<ImportPayload, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Array(_) => Ok(ImportPayload::Sections(value)),
        Value::Object(mut map) => {
            let sections = map
                .remove("sections")
                .ok_or(ImportError::UnrecognizedShape)?;
            let name = map
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string);
            let statuses = match map.remove("statuses") {
                Some(Value::Null) | None => None,
                Some(v) => Some(serde_json::from_value::<StatusRegistry>(v)?),
            };
            Ok(ImportPayload::Project {
                name,
                sections,
                statuses,
            })
        }
        _ => Err(ImportError::UnrecognizedShape),
    }
}

/// Read and parse an import file.
pub fn read_import(path: &Path) -> Result<ImportPayload, ImportError> {
    let text = fs::read_to_string(path).map_err(|e| ImportError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_import(&text)
}
