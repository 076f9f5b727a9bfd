use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tree::SectionTree;

/// A stored project: a named section forest with its creation time.
///
/// The workspace keeps the current project's sections as a live working
/// copy and syncs them back here after every committed change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Millisecond timestamp string, assigned at creation
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sections: SectionTree,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// New project with a timestamp id, created now
    pub fn new(name: impl Into<String>, sections: SectionTree) -> Self {
        let now = Utc::now();
        Project {
            id: now.timestamp_millis().to_string(),
            name: name.into(),
            sections,
            created_at: now,
        }
    }
}
