use serde::{Deserialize, Serialize};

/// Maximum nesting depth accepted on import. Inputs deeper than this are
/// rejected before they can touch any state, which keeps the recursive
/// traversals in ops/ safe from stack exhaustion.
pub const MAX_DEPTH: usize = 64;

/// A single node in the section tree.
///
/// Keys are unique by convention, not construction: imports and edits can
/// produce duplicates, and lookups resolve to the first match in pre-order.
/// `cn check` and the panel view surface duplicates instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Identifier, e.g. `"1.2"` or `"auth"`. Imports may spell this `path`.
    #[serde(alias = "path")]
    pub key: String,
    /// Display label
    pub name: String,
    /// Status name from the registry; empty string = unset.
    /// Leaf statuses are authoritative, interior ones are derived.
    #[serde(default)]
    pub status: String,
    /// Child sections in display order; empty = leaf
    #[serde(default)]
    pub children: Vec<Section>,
    /// Collapsed in the panel view; round-trips through export
    #[serde(default)]
    pub is_collapsed: bool,
}

impl Section {
    /// Create a leaf section with an empty status
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Section {
            key: key.into(),
            name: name.into(),
            status: String::new(),
            children: Vec::new(),
            is_collapsed: false,
        }
    }

    /// Leaf = no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Section::subtree_len).sum::<usize>()
    }
}
