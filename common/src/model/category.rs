use serde::{Deserialize, Serialize};

/// One node of the item catalog, stored flat.
///
/// Categories form a forest through `parent_id`. `level` is the number of
/// ancestors, so roots sit at level 0. Predefined categories are seeded at
/// startup and never change; organizers may add custom ones (`is_custom`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCategory {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub level: u32,
    pub is_custom: bool,
}

impl ItemCategory {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A category with its children nested underneath, derived from the flat
/// catalog on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHierarchy {
    pub category: ItemCategory,
    pub children: Vec<CategoryHierarchy>,
}

impl CategoryHierarchy {
    /// Number of nodes in this subtree, including the node itself.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(CategoryHierarchy::node_count)
            .sum::<usize>()
    }
}

/// One hop of a root-to-leaf category chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSegment {
    pub id: String,
    pub name: String,
}
