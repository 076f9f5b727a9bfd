use crate::model::section::Section;
use crate::model::status::StatusRegistry;
use crate::model::tree::SectionTree;

/// Recompute every interior node's status from its children, bottom-up.
///
/// Leaves are authoritative and never touched. An interior node adopts
/// its children's status when they all agree; otherwise it takes the
/// least advanced of the distinct child statuses, where rank is the
/// registry position. A status missing from the registry ranks below
/// everything known and is only adopted when no known status competes,
/// in which case the first one encountered wins. Running this twice in
/// a row changes nothing.
pub fn aggregate(tree: &mut SectionTree, registry: &StatusRegistry) {
    for root in &mut tree.roots {
        aggregate_node(root, registry);
    }
}

fn aggregate_node(node: &mut Section, registry: &StatusRegistry) {
    if node.children.is_empty() {
        return;
    }
    for child in &mut node.children {
        aggregate_node(child, registry);
    }

    let mut distinct: Vec<&str> = Vec::new();
    for child in &node.children {
        if !distinct.contains(&child.status.as_str()) {
            distinct.push(&child.status);
        }
    }

    if distinct.len() == 1 {
        node.status = distinct[0].to_string();
        return;
    }

    // strictly-lower replacement keeps the first occurrence on ties
    let rank = |status: &str| registry.rank(status).unwrap_or(usize::MAX);
    let mut best = distinct[0];
    for &candidate in &distinct[1..] {
        if rank(candidate) < rank(best) {
            best = candidate;
        }
    }
    node.status = best.to_string();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    fn node(key: &str, status: &str, children: Vec<Section>) -> Section {
        let mut s = Section::new(key, key);
        s.status = status.to_string();
        s.children = children;
        s
    }

    fn registry_abc() -> StatusRegistry {
        StatusRegistry::from_statuses(vec![
            Status::new("A", "#111111"),
            Status::new("B", "#222222"),
            Status::new("C", "#333333"),
        ])
    }

    #[test]
    fn test_leaves_keep_their_status() {
        let mut tree = SectionTree::from_roots(vec![node("1", "C", vec![])]);
        aggregate(&mut tree, &registry_abc());
        assert_eq!(tree.lookup("1").unwrap().status, "C");
    }

    #[test]
    fn test_single_distinct_status_is_adopted() {
        let mut tree = SectionTree::from_roots(vec![node(
            "1",
            "",
            vec![node("1.1", "B", vec![]), node("1.2", "B", vec![])],
        )]);
        aggregate(&mut tree, &registry_abc());
        assert_eq!(tree.lookup("1").unwrap().status, "B");
    }

    #[test]
    fn test_least_advanced_wins() {
        // children in first-occurrence order B, A, C
        let mut tree = SectionTree::from_roots(vec![node(
            "1",
            "",
            vec![
                node("1.1", "B", vec![]),
                node("1.2", "A", vec![]),
                node("1.3", "C", vec![]),
            ],
        )]);
        aggregate(&mut tree, &registry_abc());
        assert_eq!(tree.lookup("1").unwrap().status, "A");
    }

    #[test]
    fn test_aggregates_post_order_through_depth() {
        let mut tree = SectionTree::from_roots(vec![node(
            "1",
            "",
            vec![
                node(
                    "1.1",
                    "",
                    vec![node("1.1.1", "C", vec![]), node("1.1.2", "B", vec![])],
                ),
                node("1.2", "C", vec![]),
            ],
        )]);
        aggregate(&mut tree, &registry_abc());
        // 1.1 resolves to B first, then 1 compares {B, C}
        assert_eq!(tree.lookup("1.1").unwrap().status, "B");
        assert_eq!(tree.lookup("1").unwrap().status, "B");
    }

    #[test]
    fn test_interior_status_is_overwritten() {
        let mut tree = SectionTree::from_roots(vec![node(
            "1",
            "C",
            vec![node("1.1", "A", vec![])],
        )]);
        aggregate(&mut tree, &registry_abc());
        assert_eq!(tree.lookup("1").unwrap().status, "A");
    }

    #[test]
    fn test_unknown_status_never_beats_known() {
        let mut tree = SectionTree::from_roots(vec![node(
            "1",
            "",
            vec![node("1.1", "Mystery", vec![]), node("1.2", "C", vec![])],
        )]);
        aggregate(&mut tree, &registry_abc());
        assert_eq!(tree.lookup("1").unwrap().status, "C");
    }

    #[test]
    fn test_all_unknown_takes_first_encountered() {
        let mut tree = SectionTree::from_roots(vec![node(
            "1",
            "",
            vec![node("1.1", "Odd", vec![]), node("1.2", "Strange", vec![])],
        )]);
        aggregate(&mut tree, &registry_abc());
        assert_eq!(tree.lookup("1").unwrap().status, "Odd");
    }

    #[test]
    fn test_empty_status_counts_as_unknown() {
        let mut tree = SectionTree::from_roots(vec![node(
            "1",
            "",
            vec![node("1.1", "", vec![]), node("1.2", "A", vec![])],
        )]);
        aggregate(&mut tree, &registry_abc());
        assert_eq!(tree.lookup("1").unwrap().status, "A");
    }

    #[test]
    fn test_idempotent() {
        let mut tree = SectionTree::from_roots(vec![node(
            "1",
            "",
            vec![
                node(
                    "1.1",
                    "",
                    vec![node("1.1.1", "B", vec![]), node("1.1.2", "C", vec![])],
                ),
                node("1.2", "A", vec![]),
            ],
        )]);
        let registry = registry_abc();
        aggregate(&mut tree, &registry);
        let once = tree.clone();
        aggregate(&mut tree, &registry);
        assert_eq!(tree, once);
    }

    #[test]
    fn test_readme_scenario() {
        let mut tree = SectionTree::from_roots(vec![node(
            "1",
            "",
            vec![node("1.1", "Done", vec![]), node("1.2", "To Do", vec![])],
        )]);
        aggregate(&mut tree, &StatusRegistry::default());
        assert_eq!(tree.lookup("1").unwrap().status, "To Do");
    }
}
