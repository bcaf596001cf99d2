//! Pure category hierarchy logic: forest construction, depth computation and
//! breadcrumb paths.
//!
//! The hierarchy is at most three levels tall (depths 0, 1 and 2). Parent
//! chains in the database are expected to be acyclic, but corrupted data must
//! never hang a request, so every upward walk is capped at
//! [`MAX_CATEGORY_DEPTH`] hops and an over-long chain is reported as invalid.

use std::collections::HashMap;

use uuid::Uuid;

use crate::features::categories::models::Category;

/// Maximum number of levels in the category tree (root, child, grandchild)
pub const MAX_CATEGORY_DEPTH: u8 = 3;

/// A category annotated with its depth and sorted children
#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub category: Category,
    pub depth: u8,
    pub children: Vec<CategoryNode>,
}

/// Index categories by id for parent-chain walks
pub fn index_by_id(categories: &[Category]) -> HashMap<Uuid, &Category> {
    categories.iter().map(|c| (c.id, c)).collect()
}

/// Compute the depth of a category by walking its parent chain upward
/// (root = 0).
///
/// Returns `None` when the chain references a missing parent or exceeds
/// [`MAX_CATEGORY_DEPTH`] hops, which covers both over-deep data and cycles.
pub fn depth_of(category_id: Uuid, by_id: &HashMap<Uuid, &Category>) -> Option<u8> {
    let mut current = *by_id.get(&category_id)?;
    let mut depth: u8 = 0;

    while let Some(parent_id) = current.parent_id {
        depth += 1;
        if depth >= MAX_CATEGORY_DEPTH {
            return None;
        }
        current = *by_id.get(&parent_id)?;
    }

    Some(depth)
}

/// Walk the parent chain from a leaf up to its root, returned in
/// root-to-leaf order.
///
/// Returns `None` for unknown ids, broken chains and cycles (same iteration
/// cap as [`depth_of`]).
pub fn parent_chain<'a>(
    leaf_id: Uuid,
    by_id: &HashMap<Uuid, &'a Category>,
) -> Option<Vec<&'a Category>> {
    let mut chain = Vec::new();
    let mut current = *by_id.get(&leaf_id)?;
    chain.push(current);

    while let Some(parent_id) = current.parent_id {
        if chain.len() >= MAX_CATEGORY_DEPTH as usize {
            return None;
        }
        current = *by_id.get(&parent_id)?;
        chain.push(current);
    }

    chain.reverse();
    Some(chain)
}

/// Build a depth-annotated forest from a flat, arbitrarily ordered list.
///
/// Roots and every child list are sorted by `(sort_order, name, id)`
/// ascending; the id tiebreak keeps the ordering total when two siblings
/// share both sort_order and name. Nodes whose parent chain is broken or
/// deeper than the maximum are left out of the forest.
pub fn build_forest(categories: Vec<Category>) -> Vec<CategoryNode> {
    let mut by_parent: HashMap<Option<Uuid>, Vec<Category>> = HashMap::new();
    for category in categories {
        by_parent.entry(category.parent_id).or_default().push(category);
    }

    build_level(None, 0, &mut by_parent)
}

fn build_level(
    parent_id: Option<Uuid>,
    depth: u8,
    by_parent: &mut HashMap<Option<Uuid>, Vec<Category>>,
) -> Vec<CategoryNode> {
    if depth >= MAX_CATEGORY_DEPTH {
        return Vec::new();
    }

    let mut level = by_parent.remove(&parent_id).unwrap_or_default();
    level.sort_by(|a, b| {
        (a.sort_order, a.name.as_str(), a.id).cmp(&(b.sort_order, b.name.as_str(), b.id))
    });

    level
        .into_iter()
        .map(|category| {
            let children = build_level(Some(category.id), depth + 1, by_parent);
            CategoryNode {
                category,
                depth,
                children,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    fn category(name: &str, sort_order: i32, parent_id: Option<Uuid>) -> Category {
        Category {
            id: Uuid::new_v4(),
            parent_id,
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            description: Some(Sentence(3..8).fake()),
            sort_order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn depth_is_counted_from_root() {
        let root = category("Guides", 0, None);
        let child = category("Install", 0, Some(root.id));
        let grandchild = category("Linux", 0, Some(child.id));
        let all = vec![root.clone(), child.clone(), grandchild.clone()];
        let by_id = index_by_id(&all);

        assert_eq!(depth_of(root.id, &by_id), Some(0));
        assert_eq!(depth_of(child.id, &by_id), Some(1));
        assert_eq!(depth_of(grandchild.id, &by_id), Some(2));
    }

    #[test]
    fn depth_of_cyclic_chain_is_invalid_not_infinite() {
        let mut a = category("A", 0, None);
        let b = category("B", 0, Some(a.id));
        a.parent_id = Some(b.id);
        let all = vec![a.clone(), b];
        let by_id = index_by_id(&all);

        assert_eq!(depth_of(a.id, &by_id), None);
    }

    #[test]
    fn depth_of_missing_parent_is_invalid() {
        let orphan = category("Orphan", 0, Some(Uuid::new_v4()));
        let all = vec![orphan.clone()];
        let by_id = index_by_id(&all);

        assert_eq!(depth_of(orphan.id, &by_id), None);
    }

    #[test]
    fn forest_groups_and_annotates_depth_from_unsorted_input() {
        let root = category("Guides", 0, None);
        let child = category("Install", 0, Some(root.id));
        let grandchild = category("Linux", 0, Some(child.id));
        // Children arrive before their parents
        let forest = build_forest(vec![grandchild.clone(), child.clone(), root.clone()]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].category.id, root.id);
        assert_eq!(forest[0].depth, 0);
        assert_eq!(forest[0].children[0].category.id, child.id);
        assert_eq!(forest[0].children[0].depth, 1);
        assert_eq!(forest[0].children[0].children[0].category.id, grandchild.id);
        assert_eq!(forest[0].children[0].children[0].depth, 2);
    }

    #[test]
    fn siblings_sort_by_sort_order_then_name() {
        let b = category("Beta", 1, None);
        let a = category("Alpha", 1, None);
        let first = category("Zulu", 0, None);
        let forest = build_forest(vec![b.clone(), a.clone(), first.clone()]);

        let names: Vec<&str> = forest.iter().map(|n| n.category.name.as_str()).collect();
        assert_eq!(names, vec!["Zulu", "Alpha", "Beta"]);
    }

    #[test]
    fn parent_chain_runs_root_to_leaf() {
        let root = category("Guides", 0, None);
        let child = category("Install", 0, Some(root.id));
        let grandchild = category("Linux", 0, Some(child.id));
        let all = vec![root.clone(), child.clone(), grandchild.clone()];
        let by_id = index_by_id(&all);

        let chain = parent_chain(grandchild.id, &by_id).unwrap();
        let ids: Vec<Uuid> = chain.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![root.id, child.id, grandchild.id]);
        // Path length is depth + 1 and ends at the leaf
        assert_eq!(chain.len(), depth_of(grandchild.id, &by_id).unwrap() as usize + 1);
    }

    #[test]
    fn parent_chain_rejects_cycles() {
        let mut a = category("A", 0, None);
        let mut b = category("B", 0, Some(a.id));
        let c = category("C", 0, Some(b.id));
        a.parent_id = Some(c.id);
        b.parent_id = Some(a.id);
        let all = vec![a.clone(), b, c];
        let by_id = index_by_id(&all);

        assert!(parent_chain(a.id, &by_id).is_none());
    }

    #[test]
    fn forest_drops_nodes_past_the_depth_cap() {
        let root = category("Guides", 0, None);
        let child = category("Install", 0, Some(root.id));
        let grandchild = category("Linux", 0, Some(child.id));
        let too_deep = category("x86", 0, Some(grandchild.id));
        let forest = build_forest(vec![root, child, grandchild, too_deep.clone()]);

        let deepest = &forest[0].children[0].children[0];
        assert_eq!(deepest.depth, 2);
        assert!(deepest.children.is_empty());
    }
}
