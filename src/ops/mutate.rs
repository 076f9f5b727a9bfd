use indexmap::IndexMap;

use crate::model::section::{MAX_DEPTH, Section};
use crate::model::tree::SectionTree;

// All mutations resolve keys to the first pre-order match and return
// whether anything was applied. An unknown key is a silent no-op, never
// an error: callers get delete-if-present semantics for free. Every
// structural edit leaves the parent index in sync with the tree.

// ---------------------------------------------------------------------------
// Insertion
// ---------------------------------------------------------------------------

/// Append `section` to the children of `parent_key`. Indexes the whole
/// inserted subtree. False if the parent is missing or the insertion
/// would nest deeper than MAX_DEPTH.
pub fn insert_child(tree: &mut SectionTree, parent_key: &str, section: Section) -> bool {
    let mut path = Vec::new();
    if !locate_path(&tree.roots, parent_key, &mut path) {
        return false;
    }
    if path.len() - 1 + subtree_height(&section) >= MAX_DEPTH {
        return false;
    }
    let Some(parent) = node_at_mut(&mut tree.roots, &path) else {
        return false;
    };
    parent.children.push(section);
    if let Some(inserted) = parent.children.last() {
        index_subtree(&mut tree.index, parent_key, inserted);
    }
    true
}

/// Insert `section` among `parent_key`'s children, directly after the
/// child `after_key`. False unless `after_key` really is a child of
/// `parent_key`.
pub fn insert_sibling(
    tree: &mut SectionTree,
    parent_key: &str,
    after_key: &str,
    section: Section,
) -> bool {
    let mut path = Vec::new();
    if !locate_path(&tree.roots, parent_key, &mut path) {
        return false;
    }
    if path.len() - 1 + subtree_height(&section) >= MAX_DEPTH {
        return false;
    }
    let Some(parent) = node_at_mut(&mut tree.roots, &path) else {
        return false;
    };
    let Some(pos) = parent.children.iter().position(|c| c.key == after_key) else {
        return false;
    };
    parent.children.insert(pos + 1, section);
    if let Some(inserted) = parent.children.get(pos + 1) {
        index_subtree(&mut tree.index, parent_key, inserted);
    }
    true
}

/// Append a new root section. Roots get no index entry of their own;
/// any children the section brings are indexed.
pub fn insert_root(tree: &mut SectionTree, section: Section) -> bool {
    if subtree_height(&section) > MAX_DEPTH {
        return false;
    }
    tree.roots.push(section);
    if let Some(inserted) = tree.roots.last() {
        for child in &inserted.children {
            index_subtree(&mut tree.index, &inserted.key, child);
        }
    }
    true
}

/// Insert a new root directly after the root `after_key`. False if
/// `after_key` is not itself a root.
pub fn insert_root_after(tree: &mut SectionTree, after_key: &str, section: Section) -> bool {
    if subtree_height(&section) > MAX_DEPTH {
        return false;
    }
    let Some(pos) = tree.roots.iter().position(|r| r.key == after_key) else {
        return false;
    };
    tree.roots.insert(pos + 1, section);
    if let Some(inserted) = tree.roots.get(pos + 1) {
        for child in &inserted.children {
            index_subtree(&mut tree.index, &inserted.key, child);
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Removal
// ---------------------------------------------------------------------------

/// Remove the whole subtree rooted at `key`, wherever it sits. Index
/// entries for the node and every descendant are removed with it.
pub fn delete(tree: &mut SectionTree, key: &str) -> bool {
    let Some(removed) = remove_in(&mut tree.roots, key) else {
        return false;
    };
    unindex_subtree(&mut tree.index, &removed);
    true
}

fn remove_in(sections: &mut Vec<Section>, key: &str) -> Option<Section> {
    for i in 0..sections.len() {
        if sections[i].key == key {
            return Some(sections.remove(i));
        }
        if let Some(removed) = remove_in(&mut sections[i].children, key) {
            return Some(removed);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Swap
// ---------------------------------------------------------------------------

/// Exchange the positions of two sections: each subtree lands in the
/// other's slot, whether that slot is under a parent or in the root
/// sequence. Index entries for both moved nodes follow their new
/// parents. False if either key is missing, the keys are equal, or one
/// node contains the other.
pub fn swap(tree: &mut SectionTree, key_a: &str, key_b: &str) -> bool {
    let mut path_a = Vec::new();
    let mut path_b = Vec::new();
    if !locate_path(&tree.roots, key_a, &mut path_a)
        || !locate_path(&tree.roots, key_b, &mut path_b)
    {
        return false;
    }
    // a node cannot trade places with itself or its own ancestor
    if is_prefix(&path_a, &path_b) || is_prefix(&path_b, &path_a) {
        return false;
    }

    let parent_a = parent_key_at(&tree.roots, &path_a);
    let parent_b = parent_key_at(&tree.roots, &path_b);

    // walk down to the container where the two paths diverge, then split
    // it so both subtrees can be borrowed at once
    let mut d = 0;
    while path_a[d] == path_b[d] {
        d += 1;
    }
    let mut container = &mut tree.roots;
    for &i in &path_a[..d] {
        container = &mut container[i].children;
    }
    let (i, j) = (path_a[d], path_b[d]);
    let (lo, hi) = container.split_at_mut(i.max(j));
    let (side_a, side_b) = if i < j {
        (&mut lo[i], &mut hi[0])
    } else {
        (&mut hi[0], &mut lo[j])
    };
    let Some(slot_a) = descend(side_a, &path_a[d + 1..]) else {
        return false;
    };
    let Some(slot_b) = descend(side_b, &path_b[d + 1..]) else {
        return false;
    };
    std::mem::swap(slot_a, slot_b);

    reindex_moved(&mut tree.index, key_a, parent_b);
    reindex_moved(&mut tree.index, key_b, parent_a);
    true
}

fn reindex_moved(index: &mut IndexMap<String, String>, key: &str, new_parent: Option<String>) {
    match new_parent {
        Some(parent) => {
            index.insert(key.to_string(), parent);
        }
        None => {
            index.shift_remove(key);
        }
    }
}

// ---------------------------------------------------------------------------
// Field edits
// ---------------------------------------------------------------------------

pub fn rename(tree: &mut SectionTree, key: &str, new_name: &str) -> bool {
    match tree.lookup_mut(key) {
        Some(section) => {
            section.name = new_name.to_string();
            true
        }
        None => false,
    }
}

/// Change a section's key. The old key is rewritten everywhere it
/// appears in the index: the node's own entry and every child entry
/// pointing at it as a parent.
pub fn rekey(tree: &mut SectionTree, key: &str, new_key: &str) -> bool {
    let Some(section) = tree.lookup_mut(key) else {
        return false;
    };
    section.key = new_key.to_string();
    if let Some(parent) = tree.index.shift_remove(key) {
        tree.index.insert(new_key.to_string(), parent);
    }
    for parent in tree.index.values_mut() {
        if parent == key {
            *parent = new_key.to_string();
        }
    }
    true
}

pub fn toggle_collapse(tree: &mut SectionTree, key: &str) -> bool {
    match tree.lookup_mut(key) {
        Some(section) => {
            section.is_collapsed = !section.is_collapsed;
            true
        }
        None => false,
    }
}

/// Set a section's status. On a leaf this is authoritative; on an
/// interior node it only lasts until the next aggregation pass.
/// Status-relevant changes expect an aggregation run afterwards;
/// structural mutations never trigger one themselves.
pub fn set_status(tree: &mut SectionTree, key: &str, status: &str) -> bool {
    match tree.lookup_mut(key) {
        Some(section) => {
            section.status = status.to_string();
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Pre-order search recording the child-index path to the first match
fn locate_path(sections: &[Section], key: &str, path: &mut Vec<usize>) -> bool {
    for (i, section) in sections.iter().enumerate() {
        path.push(i);
        if section.key == key {
            return true;
        }
        if locate_path(&section.children, key, path) {
            return true;
        }
        path.pop();
    }
    false
}

fn node_at_mut<'a>(roots: &'a mut [Section], path: &[usize]) -> Option<&'a mut Section> {
    let (&first, rest) = path.split_first()?;
    let mut node = roots.get_mut(first)?;
    for &i in rest {
        node = node.children.get_mut(i)?;
    }
    Some(node)
}

fn descend<'a>(mut node: &'a mut Section, rest: &[usize]) -> Option<&'a mut Section> {
    for &i in rest {
        node = node.children.get_mut(i)?;
    }
    Some(node)
}

fn parent_key_at(roots: &[Section], path: &[usize]) -> Option<String> {
    if path.len() <= 1 {
        return None;
    }
    let mut node = roots.get(path[0])?;
    for &i in &path[1..path.len() - 1] {
        node = node.children.get(i)?;
    }
    Some(node.key.clone())
}

fn is_prefix(a: &[usize], b: &[usize]) -> bool {
    a.len() <= b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

fn subtree_height(section: &Section) -> usize {
    1 + section
        .children
        .iter()
        .map(subtree_height)
        .max()
        .unwrap_or(0)
}

fn index_subtree(index: &mut IndexMap<String, String>, parent_key: &str, section: &Section) {
    index.insert(section.key.clone(), parent_key.to_string());
    for child in &section.children {
        index_subtree(index, &section.key, child);
    }
}

fn unindex_subtree(index: &mut IndexMap<String, String>, section: &Section) {
    index.shift_remove(&section.key);
    for child in &section.children {
        unindex_subtree(index, child);
    }
}
