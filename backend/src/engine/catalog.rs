//! # Category Catalog
//!
//! Flat storage of item categories plus the two derived views the rest of the
//! engine needs: the root-to-leaf path of one category and the full forest.
//!
//! Both views are recomputed from the store on every call, so a category added
//! a moment ago is always visible. The parent graph is expected to be acyclic;
//! if a cycle or a dangling parent ever shows up, the walk stops and reports
//! `CorruptCatalog` instead of looping or returning a partial tree.

use crate::engine::seed::PREDEFINED_CATEGORIES;
use crate::error::{EngineError, EngineResult};
use crate::store::CategoryStore;
use common::model::category::{CategoryHierarchy, ItemCategory, PathSegment};
use log::{debug, error, info};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct CategoryCatalog {
    store: Arc<dyn CategoryStore>,
}

impl CategoryCatalog {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// Adds a category under `parent_id`, or as a root when no parent is given.
    pub fn add_category(
        &self,
        name: &str,
        parent_id: Option<&str>,
        is_custom: bool,
    ) -> EngineResult<ItemCategory> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidRequest(
                "category name must not be blank".to_string(),
            ));
        }

        let level = match parent_id {
            Some(parent_id) => {
                let parent = self.store.get(parent_id)?.ok_or_else(|| {
                    EngineError::InvalidParent(format!("category '{parent_id}' does not exist"))
                })?;
                parent.level + 1
            }
            None => 0,
        };

        let category = ItemCategory {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
            level,
            is_custom,
        };
        self.store.insert(category.clone())?;
        info!(
            "Added category '{}' ({}) at level {}",
            category.name, category.id, category.level
        );
        Ok(category)
    }

    pub fn get(&self, id: &str) -> EngineResult<ItemCategory> {
        self.store.get(id)?.ok_or_else(|| {
            debug!("Category lookup missed: {id}");
            EngineError::not_found("category", id)
        })
    }

    pub fn list(&self) -> EngineResult<Vec<ItemCategory>> {
        self.store.list()
    }

    /// Names from the root down to `id`, inclusive.
    pub fn get_path(&self, id: &str) -> EngineResult<Vec<String>> {
        Ok(self
            .get_path_segments(id)?
            .into_iter()
            .map(|segment| segment.name)
            .collect())
    }

    /// Ids and names from the root down to `id`, inclusive.
    pub fn get_path_segments(&self, id: &str) -> EngineResult<Vec<PathSegment>> {
        path_segments(&self.store.list()?, id)
    }

    pub fn build_hierarchy(&self) -> EngineResult<Vec<CategoryHierarchy>> {
        build_hierarchy(&self.store.list()?)
    }

    /// Renames a custom category. Predefined categories are immutable.
    ///
    /// Needs that already captured this category keep the old name in their
    /// stored path.
    pub fn rename_category(&self, id: &str, name: &str) -> EngineResult<ItemCategory> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidRequest(
                "category name must not be blank".to_string(),
            ));
        }
        let current = self.get(id)?;
        if !current.is_custom {
            return Err(EngineError::InvalidRequest(format!(
                "category '{id}' is predefined and cannot be renamed"
            )));
        }
        let renamed = self.store.rename(id, name)?;
        info!("Renamed category {id} from '{}' to '{}'", current.name, renamed.name);
        Ok(renamed)
    }

    /// Inserts the predefined catalog. Ids already present are left alone, so
    /// calling this on every startup is harmless.
    pub fn seed_predefined(&self) -> EngineResult<usize> {
        let mut inserted = 0;
        for seed in PREDEFINED_CATEGORIES {
            if self.store.get(seed.id)?.is_some() {
                continue;
            }
            let level = match seed.parent_id {
                Some(parent_id) => self.get(parent_id)?.level + 1,
                None => 0,
            };
            self.store.insert(ItemCategory {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                parent_id: seed.parent_id.map(str::to_string),
                level,
                is_custom: false,
            })?;
            inserted += 1;
        }
        info!("Seeded {inserted} predefined categories");
        Ok(inserted)
    }
}

/// Walks parent links from `id` up to its root.
pub fn path_segments(categories: &[ItemCategory], id: &str) -> EngineResult<Vec<PathSegment>> {
    let by_id: HashMap<&str, &ItemCategory> =
        categories.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut current = *by_id
        .get(id)
        .ok_or_else(|| EngineError::not_found("category", id))?;
    let mut visited = HashSet::new();
    let mut segments = Vec::new();

    loop {
        if !visited.insert(current.id.as_str()) {
            error!("Cycle in category parent chain at '{}'", current.id);
            return Err(EngineError::CorruptCatalog(format!(
                "cycle in parent chain of category '{id}' at '{}'",
                current.id
            )));
        }
        segments.push(PathSegment {
            id: current.id.clone(),
            name: current.name.clone(),
        });
        match current.parent_id.as_deref() {
            None => break,
            Some(parent_id) => {
                current = *by_id.get(parent_id).ok_or_else(|| {
                    error!("Category '{}' points at missing parent '{parent_id}'", current.id);
                    EngineError::CorruptCatalog(format!(
                        "category '{}' references missing parent '{parent_id}'",
                        current.id
                    ))
                })?;
            }
        }
    }

    segments.reverse();
    Ok(segments)
}

/// Nests the flat catalog into a forest. Children keep catalog insertion order.
pub fn build_hierarchy(categories: &[ItemCategory]) -> EngineResult<Vec<CategoryHierarchy>> {
    let mut children_of: HashMap<&str, Vec<&ItemCategory>> = HashMap::new();
    let mut roots = Vec::new();
    for category in categories {
        match category.parent_id.as_deref() {
            Some(parent_id) => children_of.entry(parent_id).or_default().push(category),
            None => roots.push(category),
        }
    }

    fn nest(
        category: &ItemCategory,
        children_of: &HashMap<&str, Vec<&ItemCategory>>,
    ) -> CategoryHierarchy {
        let children = children_of
            .get(category.id.as_str())
            .map(|children| {
                children
                    .iter()
                    .map(|child| nest(child, children_of))
                    .collect()
            })
            .unwrap_or_default();
        CategoryHierarchy {
            category: category.clone(),
            children,
        }
    }

    let forest: Vec<CategoryHierarchy> = roots
        .into_iter()
        .map(|root| nest(root, &children_of))
        .collect();

    // Anything not reachable from a root sits on a cycle or under a missing parent.
    let reached: usize = forest.iter().map(CategoryHierarchy::node_count).sum();
    if reached != categories.len() {
        let mut reachable = HashSet::new();
        let mut stack: Vec<&CategoryHierarchy> = forest.iter().collect();
        while let Some(node) = stack.pop() {
            reachable.insert(node.category.id.as_str());
            stack.extend(node.children.iter());
        }
        let stranded: Vec<&str> = categories
            .iter()
            .map(|c| c.id.as_str())
            .filter(|id| !reachable.contains(id))
            .collect();
        error!("Catalog has unreachable categories: {stranded:?}");
        return Err(EngineError::CorruptCatalog(format!(
            "categories not reachable from any root: {}",
            stranded.join(", ")
        )));
    }

    Ok(forest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryCategoryStore;

    fn category(id: &str, name: &str, parent: Option<&str>, level: u32) -> ItemCategory {
        ItemCategory {
            id: id.to_string(),
            name: name.to_string(),
            parent_id: parent.map(str::to_string),
            level,
            is_custom: false,
        }
    }

    fn medicine_chain() -> Vec<ItemCategory> {
        vec![
            category("m", "Medicine", None, 0),
            category("p", "Painkillers", Some("m"), 1),
            category("n", "Nurofen", Some("p"), 2),
        ]
    }

    fn catalog() -> CategoryCatalog {
        CategoryCatalog::new(Arc::new(MemoryCategoryStore::default()))
    }

    #[test]
    fn path_runs_root_to_leaf() {
        let segments = path_segments(&medicine_chain(), "n").unwrap();
        let names: Vec<_> = segments.iter().map(|s| s.name.as_str()).collect();
        let ids: Vec<_> = segments.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(names, ["Medicine", "Painkillers", "Nurofen"]);
        assert_eq!(ids, ["m", "p", "n"]);
    }

    #[test]
    fn path_of_unknown_id_is_not_found() {
        assert!(matches!(
            path_segments(&medicine_chain(), "zzz"),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn cyclic_parent_chain_terminates_with_error() {
        let categories = vec![
            category("a", "A", Some("b"), 1),
            category("b", "B", Some("a"), 1),
        ];
        assert!(matches!(
            path_segments(&categories, "a"),
            Err(EngineError::CorruptCatalog(_))
        ));
        assert!(matches!(
            build_hierarchy(&categories),
            Err(EngineError::CorruptCatalog(_))
        ));
    }

    #[test]
    fn dangling_parent_is_reported() {
        let categories = vec![category("x", "Orphan", Some("gone"), 1)];
        assert!(matches!(
            path_segments(&categories, "x"),
            Err(EngineError::CorruptCatalog(_))
        ));
    }

    #[test]
    fn add_category_computes_level_and_path_length() {
        let catalog = catalog();
        let root = catalog.add_category("Medicine", None, false).unwrap();
        let mid = catalog
            .add_category("Painkillers", Some(&root.id), false)
            .unwrap();
        let leaf = catalog.add_category("Nurofen", Some(&mid.id), true).unwrap();

        assert_eq!(root.level, 0);
        assert_eq!(leaf.level, 2);
        for c in [&root, &mid, &leaf] {
            let path = catalog.get_path(&c.id).unwrap();
            assert_eq!(path.len() as u32, c.level + 1);
            assert_eq!(path.last(), Some(&c.name));
        }
        assert_eq!(
            catalog.get_path(&leaf.id).unwrap(),
            ["Medicine", "Painkillers", "Nurofen"]
        );
    }

    #[test]
    fn add_category_rejects_unknown_parent() {
        let err = catalog()
            .add_category("Nurofen", Some("missing"), true)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidParent(_)));
    }

    #[test]
    fn add_category_rejects_blank_name() {
        let err = catalog().add_category("   ", None, true).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
    }

    #[test]
    fn hierarchy_covers_every_category_in_insertion_order() {
        let catalog = catalog();
        catalog.seed_predefined().unwrap();
        let food = catalog.get("food").unwrap();
        let custom = catalog.add_category("Dog food", Some(&food.id), true).unwrap();

        let forest = catalog.build_hierarchy().unwrap();
        let total: usize = forest.iter().map(CategoryHierarchy::node_count).sum();
        assert_eq!(total, catalog.list().unwrap().len());

        fn check_levels(node: &CategoryHierarchy) {
            for child in &node.children {
                assert_eq!(child.category.level, node.category.level + 1);
                check_levels(child);
            }
        }
        forest.iter().for_each(check_levels);

        let food_node = forest.iter().find(|n| n.category.id == "food").unwrap();
        assert_eq!(food_node.children.last().unwrap().category.id, custom.id);
    }

    #[test]
    fn hierarchy_sees_categories_added_after_a_previous_build() {
        let catalog = catalog();
        let root = catalog.add_category("Medicine", None, false).unwrap();
        assert_eq!(catalog.build_hierarchy().unwrap()[0].children.len(), 0);
        catalog.add_category("Bandages", Some(&root.id), true).unwrap();
        assert_eq!(catalog.build_hierarchy().unwrap()[0].children.len(), 1);
    }

    #[test]
    fn seeding_twice_inserts_nothing_new() {
        let catalog = catalog();
        let first = catalog.seed_predefined().unwrap();
        assert_eq!(first, PREDEFINED_CATEGORIES.len());
        assert_eq!(catalog.seed_predefined().unwrap(), 0);
        assert_eq!(
            catalog.get_path("nurofen").unwrap(),
            ["Medicine", "Painkillers", "Nurofen"]
        );
    }

    #[test]
    fn only_custom_categories_can_be_renamed() {
        let catalog = catalog();
        catalog.seed_predefined().unwrap();
        assert!(matches!(
            catalog.rename_category("medicine", "Meds"),
            Err(EngineError::InvalidRequest(_))
        ));

        let custom = catalog
            .add_category("Insulin", Some("medicine"), true)
            .unwrap();
        let renamed = catalog.rename_category(&custom.id, "Insulin pens").unwrap();
        assert_eq!(renamed.name, "Insulin pens");
        assert_eq!(
            catalog.get_path(&custom.id).unwrap(),
            ["Medicine", "Insulin pens"]
        );
    }
}
