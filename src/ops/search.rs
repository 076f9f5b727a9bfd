use std::ops::Range;

use regex::Regex;

use crate::model::section::Section;
use crate::model::tree::SectionTree;

/// Which field of a section matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Key,
    Name,
}

/// A search hit for a section field
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub key: String,
    pub name: String,
    /// Ancestor names from the root down to the matching section's parent
    pub trail: Vec<String>,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search every section's key and name, depth-first.
pub fn search_sections(tree: &SectionTree, re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    let mut trail = Vec::new();
    for root in &tree.roots {
        search_section(re, root, &mut trail, &mut hits);
    }
    hits
}

fn search_section(
    re: &Regex,
    section: &Section,
    trail: &mut Vec<String>,
    hits: &mut Vec<SearchHit>,
) {
    // Key
    let spans = find_matches(re, &section.key);
    if !spans.is_empty() {
        hits.push(SearchHit {
            key: section.key.clone(),
            name: section.name.clone(),
            trail: trail.clone(),
            field: MatchField::Key,
            spans,
        });
    }

    // Name
    let spans = find_matches(re, &section.name);
    if !spans.is_empty() {
        hits.push(SearchHit {
            key: section.key.clone(),
            name: section.name.clone(),
            trail: trail.clone(),
            field: MatchField::Name,
            spans,
        });
    }

    trail.push(section.name.clone());
    for child in &section.children {
        search_section(re, child, trail, hits);
    }
    trail.pop();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
