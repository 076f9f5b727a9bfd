use indexmap::IndexMap;
use serde::Serialize;

use crate::model::status::StatusRegistry;
use crate::model::tree::SectionTree;

/// Structured result from `cn stats`, suitable for --json output.
#[derive(Debug, Serialize)]
pub struct TreeStats {
    pub sections: usize,
    pub roots: usize,
    pub leaves: usize,
    /// Number of levels in the tree (1 for a flat list of roots).
    pub depth: usize,
    /// Section counts per status, in registry order. Statuses the registry
    /// does not define are appended in first-seen order.
    pub by_status: IndexMap<String, usize>,
    /// Sections with no status at all.
    pub unset: usize,
}

/// Count sections, levels and status usage across the tree.
pub fn tree_stats(tree: &SectionTree, registry: &StatusRegistry) -> TreeStats {
    let mut by_status: IndexMap<String, usize> = IndexMap::new();
    for (name, _) in registry.iter() {
        by_status.insert(name.to_string(), 0);
    }

    let mut sections = 0;
    let mut leaves = 0;
    let mut depth = 0;
    let mut unset = 0;

    for (section, level) in tree.iter() {
        sections += 1;
        if section.is_leaf() {
            leaves += 1;
        }
        depth = depth.max(level + 1);
        if section.status.is_empty() {
            unset += 1;
        } else {
            *by_status.entry(section.status.clone()).or_insert(0) += 1;
        }
    }

    TreeStats {
        sections,
        roots: tree.roots.len(),
        leaves,
        depth,
        by_status,
        unset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::section::Section;
    use crate::model::status::Status;

    fn node(key: &str, name: &str, status: &str, children: Vec<Section>) -> Section {
        let mut section = Section::new(key, name);
        section.status = status.to_string();
        section.children = children;
        section
    }

    fn registry_ab() -> StatusRegistry {
        StatusRegistry::from_statuses(vec![
            Status {
                name: "A".to_string(),
                color: "#FFB3BA".to_string(),
            },
            Status {
                name: "B".to_string(),
                color: "#FFDFBA".to_string(),
            },
        ])
    }

    #[test]
    fn test_stats_counts_and_depth() {
        let tree = SectionTree::from_roots(vec![
            node(
                "1",
                "Build",
                "A",
                vec![node("1.1", "Parser", "B", vec![node("1.1.1", "Deep", "B", vec![])])],
            ),
            node("2", "Ship", "A", vec![]),
        ]);
        let stats = tree_stats(&tree, &registry_ab());
        assert_eq!(stats.sections, 4);
        assert_eq!(stats.roots, 2);
        assert_eq!(stats.leaves, 2);
        assert_eq!(stats.depth, 3);
        assert_eq!(stats.by_status.get("A"), Some(&2));
        assert_eq!(stats.by_status.get("B"), Some(&2));
        assert_eq!(stats.unset, 0);
    }

    #[test]
    fn test_stats_registry_order_with_unknowns_appended() {
        let tree = SectionTree::from_roots(vec![
            node("1", "One", "Mystery", vec![]),
            node("2", "Two", "A", vec![]),
        ]);
        let stats = tree_stats(&tree, &registry_ab());
        let names: Vec<&str> = stats.by_status.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["A", "B", "Mystery"]);
        assert_eq!(stats.by_status.get("B"), Some(&0));
        assert_eq!(stats.by_status.get("Mystery"), Some(&1));
    }

    #[test]
    fn test_stats_empty_tree() {
        let stats = tree_stats(&SectionTree::default(), &registry_ab());
        assert_eq!(stats.sections, 0);
        assert_eq!(stats.depth, 0);
        assert_eq!(stats.by_status.get("A"), Some(&0));
    }

    #[test]
    fn test_stats_counts_unset_separately() {
        let tree = SectionTree::from_roots(vec![
            node("1", "One", "", vec![]),
            node("2", "Two", "A", vec![]),
        ]);
        let stats = tree_stats(&tree, &registry_ab());
        assert_eq!(stats.unset, 1);
        assert_eq!(stats.by_status.get("A"), Some(&1));
    }
}
