use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::project::Project;
use crate::model::section::Section;
use crate::model::status::StatusRegistry;
use crate::model::tree::SectionTree;
use crate::ops::search::{MatchField, SearchHit};
use crate::ops::stats::TreeStats;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct SectionRowJson {
    pub key: String,
    pub name: String,
    pub status: String,
    pub depth: usize,
}

#[derive(Serialize)]
pub struct StatusSlotJson {
    pub index: usize,
    pub name: String,
    pub color: String,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub key: String,
    pub name: String,
    pub field: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trail: Vec<String>,
}

#[derive(Serialize)]
pub struct ProjectInfoJson {
    pub id: String,
    pub name: String,
    pub current: bool,
    pub sections: usize,
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn section_row(section: &Section, depth: usize) -> SectionRowJson {
    SectionRowJson {
        key: section.key.clone(),
        name: section.name.clone(),
        status: section.status.clone(),
        depth,
    }
}

pub fn status_slots(registry: &StatusRegistry) -> Vec<StatusSlotJson> {
    registry
        .iter()
        .enumerate()
        .map(|(i, (name, color))| StatusSlotJson {
            index: i,
            name: name.to_string(),
            color: color.to_string(),
        })
        .collect()
}

pub fn search_hit_to_json(hit: &SearchHit) -> SearchHitJson {
    SearchHitJson {
        key: hit.key.clone(),
        name: hit.name.clone(),
        field: match hit.field {
            MatchField::Key => "key".to_string(),
            MatchField::Name => "name".to_string(),
        },
        trail: hit.trail.clone(),
    }
}

pub fn project_info(project: &Project, current: bool) -> ProjectInfoJson {
    ProjectInfoJson {
        id: project.id.clone(),
        name: project.name.clone(),
        current,
        sections: project.sections.len(),
        created_at: project.created_at.to_rfc3339(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format one section as a single line: key, name, bracketed status,
/// and a collapse marker when the node is folded in the panel
pub fn format_section_line(section: &Section) -> String {
    let marker = if section.is_collapsed { "  ▸" } else { "" };
    format!(
        "{}  {}  [{}]{}",
        section.key, section.name, section.status, marker
    )
}

/// Format a whole forest as indented lines
pub fn format_tree(tree: &SectionTree) -> Vec<String> {
    tree.iter()
        .map(|(section, depth)| format!("{}{}", "  ".repeat(depth), format_section_line(section)))
        .collect()
}

/// Format a single subtree as indented lines
pub fn format_subtree(section: &Section) -> Vec<String> {
    let mut lines = Vec::new();
    push_subtree_lines(section, 0, &mut lines);
    lines
}

fn push_subtree_lines(section: &Section, depth: usize, lines: &mut Vec<String>) {
    lines.push(format!(
        "{}{}",
        "  ".repeat(depth),
        format_section_line(section)
    ));
    for child in &section.children {
        push_subtree_lines(child, depth + 1, lines);
    }
}

/// Format flat rows with aligned key and status columns
pub fn format_flat_rows(rows: &[SectionRowJson]) -> Vec<String> {
    let key_w = rows.iter().map(|r| r.key.len()).max().unwrap_or(0).max(3);
    let status_w = rows
        .iter()
        .map(|r| r.status.len())
        .max()
        .unwrap_or(0)
        .max(6);
    rows.iter()
        .map(|r| {
            format!(
                "{:<key_w$}  {:<status_w$}  {}",
                r.key, r.status, r.name
            )
        })
        .collect()
}

/// Format the status palette, least advanced first
pub fn format_statuses(registry: &StatusRegistry) -> Vec<String> {
    let name_w = registry
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0)
        .max(4);
    registry
        .iter()
        .enumerate()
        .map(|(i, (name, color))| format!("{:>2}  {:<name_w$}  {}", i, name, color))
        .collect()
}

pub fn format_search_hit(hit: &SearchHit) -> String {
    if hit.trail.is_empty() {
        format!("{}  {}", hit.key, hit.name)
    } else {
        format!("{}  {}  ({})", hit.key, hit.name, hit.trail.join(" > "))
    }
}

pub fn format_stats(stats: &TreeStats) -> Vec<String> {
    let mut lines = vec![format!(
        "sections: {}  (roots {}, leaves {}, depth {})",
        stats.sections, stats.roots, stats.leaves, stats.depth
    )];
    let name_w = stats
        .by_status
        .keys()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(5);
    for (name, count) in &stats.by_status {
        lines.push(format!("  {:<name_w$}  {}", name, count));
    }
    if stats.unset > 0 {
        lines.push(format!("  {:<name_w$}  {}", "unset", stats.unset));
    }
    lines
}

/// Format a relative time string like "2 min ago", "yesterday", "3 days ago"
pub fn relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    let secs = duration.num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }
    let mins = duration.num_minutes();
    if mins < 60 {
        return format!("{} min ago", mins);
    }
    let hours = duration.num_hours();
    if hours < 24 {
        return format!("{} hr ago", hours);
    }
    let days = duration.num_days();
    if days == 1 {
        return "yesterday".to_string();
    }
    if days < 7 {
        return format!("{} days ago", days);
    }
    let weeks = days / 7;
    if weeks < 5 {
        return format!("{} weeks ago", weeks);
    }
    format!("{} months ago", days / 30)
}
