use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::Section;

/// An ordered forest of sections plus the parent index.
///
/// The index maps child key to parent key; root keys are absent. It is
/// the authority for parentage: `lookup_parent` never searches the tree.
/// `rebuild_index` restores it in one pass after a wholesale replacement,
/// and every structural edit in ops/mutate patches it in lockstep.
///
/// Serializes as the bare root array; the index is rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionTree {
    pub roots: Vec<Section>,
    pub index: IndexMap<String, String>,
}

impl SectionTree {
    pub fn new() -> Self {
        SectionTree::default()
    }

    /// Adopt `roots` wholesale and rebuild the index
    pub fn from_roots(roots: Vec<Section>) -> Self {
        let mut tree = SectionTree {
            roots,
            index: IndexMap::new(),
        };
        tree.rebuild_index();
        tree
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of sections in the forest
    pub fn len(&self) -> usize {
        self.roots.iter().map(Section::subtree_len).sum()
    }

    /// First section matching `key` in pre-order, if any.
    /// With duplicate keys the earliest match wins.
    pub fn lookup(&self, key: &str) -> Option<&Section> {
        find_in(&self.roots, key)
    }

    pub fn lookup_mut(&mut self, key: &str) -> Option<&mut Section> {
        find_in_mut(&mut self.roots, key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Parent key from the index; None for roots and unknown keys
    pub fn parent_key(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(String::as_str)
    }

    /// Parent section, resolved through the index
    pub fn lookup_parent(&self, key: &str) -> Option<&Section> {
        let parent = self.index.get(key)?.clone();
        self.lookup(&parent)
    }

    /// Recompute the whole index from the tree structure
    pub fn rebuild_index(&mut self) {
        self.index.clear();
        for root in &self.roots {
            index_children(&mut self.index, root);
        }
    }

    /// Pre-order traversal yielding `(section, depth)`
    pub fn iter(&self) -> SectionIter<'_> {
        let mut stack: Vec<(&Section, usize)> = Vec::new();
        for root in self.roots.iter().rev() {
            stack.push((root, 0));
        }
        SectionIter { stack }
    }
}

fn find_in<'a>(sections: &'a [Section], key: &str) -> Option<&'a Section> {
    for section in sections {
        if section.key == key {
            return Some(section);
        }
        if let Some(found) = find_in(&section.children, key) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(sections: &'a mut [Section], key: &str) -> Option<&'a mut Section> {
    for section in sections {
        if section.key == key {
            return Some(section);
        }
        if let Some(found) = find_in_mut(&mut section.children, key) {
            return Some(found);
        }
    }
    None
}

fn index_children(index: &mut IndexMap<String, String>, parent: &Section) {
    for child in &parent.children {
        index.insert(child.key.clone(), parent.key.clone());
        index_children(index, child);
    }
}

pub struct SectionIter<'a> {
    stack: Vec<(&'a Section, usize)>,
}

impl<'a> Iterator for SectionIter<'a> {
    type Item = (&'a Section, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (section, depth) = self.stack.pop()?;
        for child in section.children.iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((section, depth))
    }
}

impl Serialize for SectionTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.roots.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SectionTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let roots = Vec::<Section>::deserialize(deserializer)?;
        Ok(SectionTree::from_roots(roots))
    }
}
