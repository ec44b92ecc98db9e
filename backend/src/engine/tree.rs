//! # Response-Tree Builder
//!
//! Arranges a flat list of category-tagged records into a display tree using
//! the paths stored on each record, not the live catalog.
//!
//! Nodes are keyed by category id, so two categories that share a display
//! name under different parents stay apart. Records that only have a name
//! path (no id path of matching length) fall back to name-derived keys.

use common::model::need::ItemWithQuantity;
use common::model::projection::{ItemProjection, TreeNode};

const UNCATEGORIZED: &str = "uncategorized";

/// Anything that carries a denormalized category path.
pub trait CategoryPathed {
    fn category_path(&self) -> &[String];
    fn category_id_path(&self) -> &[String];
}

impl CategoryPathed for ItemWithQuantity {
    fn category_path(&self) -> &[String] {
        &self.category_path
    }

    fn category_id_path(&self) -> &[String] {
        &self.category_id_path
    }
}

impl CategoryPathed for ItemProjection {
    fn category_path(&self) -> &[String] {
        &self.category_path
    }

    fn category_id_path(&self) -> &[String] {
        &self.category_id_path
    }
}

struct Segment<'a> {
    key: String,
    name: &'a str,
}

fn segments_of<T: CategoryPathed>(record: &T) -> Vec<Segment<'_>> {
    let names = record.category_path();
    let ids = record.category_id_path();
    if names.is_empty() {
        return vec![Segment {
            key: UNCATEGORIZED.to_string(),
            name: "Uncategorized",
        }];
    }
    if ids.len() == names.len() {
        ids.iter()
            .zip(names)
            .map(|(id, name)| Segment {
                key: id.clone(),
                name,
            })
            .collect()
    } else {
        // Key each level by the whole name prefix so equal names at different
        // depths or under different parents do not merge.
        let mut prefix = String::from("name:");
        names
            .iter()
            .map(|name| {
                prefix.push('/');
                prefix.push_str(name);
                Segment {
                    key: prefix.clone(),
                    name,
                }
            })
            .collect()
    }
}

fn find_or_insert<'t, T>(level: &'t mut Vec<TreeNode<T>>, segment: &Segment<'_>) -> &'t mut TreeNode<T> {
    let position = match level.iter().position(|node| node.key == segment.key) {
        Some(position) => position,
        None => {
            level.push(TreeNode {
                key: segment.key.clone(),
                name: segment.name.to_string(),
                children: Vec::new(),
                items: Vec::new(),
            });
            level.len() - 1
        }
    };
    &mut level[position]
}

/// Builds the tree. Sibling order is the order in which nodes were first seen.
pub fn build_tree<T: CategoryPathed>(records: impl IntoIterator<Item = T>) -> Vec<TreeNode<T>> {
    let mut roots: Vec<TreeNode<T>> = Vec::new();
    for record in records {
        let segments = segments_of(&record);
        let target = {
            let Some((last, parents)) = segments.split_last() else {
                continue;
            };
            let mut level = &mut roots;
            for segment in parents {
                level = &mut find_or_insert(level, segment).children;
            }
            find_or_insert(level, last)
        };
        drop(segments);
        target.items.push(record);
    }
    roots
}
