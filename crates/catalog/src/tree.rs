//! Ordering helpers for the host's hierarchical trees.
//!
//! The host stores categories and locations as nested sets and lists them in
//! `(tree_id, lft)` order: a depth-first walk where roots and siblings are
//! ordered by name. Stores without nested-set columns reproduce that order
//! from parent links with [`tree_order`].

use std::collections::HashMap;
use std::hash::Hash;

use bulkparts_core::TreeNode;

/// Sort key placing a node after its ancestors and among its siblings by
/// `(name, id)`.
pub fn tree_sort_key<N>(node: &N, by_id: &HashMap<N::Id, &N>) -> Vec<(String, i64)>
where
    N: TreeNode,
    N::Id: Copy + Into<i64>,
{
    let mut key = Vec::new();
    let mut current = Some(node);

    // A corrupt parent chain must not loop forever.
    let mut remaining = by_id.len() + 1;
    while let Some(n) = current {
        if remaining == 0 {
            break;
        }
        remaining -= 1;

        key.push((n.name().to_string(), (*n.id()).into()));
        current = n.parent().and_then(|p| by_id.get(p).copied());
    }

    key.reverse();
    key
}

/// Return `nodes` in depth-first tree order.
pub fn tree_order<N>(nodes: &[N]) -> Vec<N>
where
    N: TreeNode + Clone,
    N::Id: Copy + Into<i64> + Eq + Hash,
{
    let by_id: HashMap<N::Id, &N> = nodes.iter().map(|n| (*n.id(), n)).collect();

    let mut keyed: Vec<(Vec<(String, i64)>, &N)> = nodes
        .iter()
        .map(|n| (tree_sort_key(n, &by_id), n))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    keyed.into_iter().map(|(_, n)| n.clone()).collect()
}

/// Display path of a child node given its parent's path.
pub fn child_pathstring(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(p) if !p.is_empty() => format!("{p}/{name}"),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;
    use bulkparts_core::LocationId;

    fn loc(id: i64, name: &str, parent: Option<i64>, path: &str) -> Location {
        Location {
            id: LocationId::new(id),
            name: name.to_string(),
            description: String::new(),
            parent_id: parent.map(LocationId::new),
            pathstring: path.to_string(),
        }
    }

    #[test]
    fn orders_depth_first_with_siblings_by_name() {
        let nodes = vec![
            loc(1, "Warehouse", None, "Warehouse"),
            loc(2, "Shelf B", Some(1), "Warehouse/Shelf B"),
            loc(3, "Office", None, "Office"),
            loc(4, "Shelf A", Some(1), "Warehouse/Shelf A"),
            loc(5, "Bin 1", Some(2), "Warehouse/Shelf B/Bin 1"),
        ];

        let ordered: Vec<i64> = tree_order(&nodes).iter().map(|l| l.id.get()).collect();
        assert_eq!(ordered, vec![3, 1, 4, 2, 5]);
    }

    #[test]
    fn tolerates_parent_cycles() {
        let nodes = vec![loc(1, "A", Some(2), "A"), loc(2, "B", Some(1), "B")];
        assert_eq!(tree_order(&nodes).len(), 2);
    }

    #[test]
    fn child_pathstring_joins_with_slash() {
        assert_eq!(child_pathstring(None, "Warehouse"), "Warehouse");
        assert_eq!(child_pathstring(Some("Warehouse"), "Shelf"), "Warehouse/Shelf");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every node is listed after its parent.
            #[test]
            fn parents_precede_children(
                shape in prop::collection::vec((0usize..100, "[a-z]{1,4}"), 1..30)
            ) {
                let nodes: Vec<Location> = shape
                    .iter()
                    .enumerate()
                    .map(|(i, (r, name))| {
                        let parent = if i == 0 || r % 3 == 0 { None } else { Some((r % i) as i64 + 1) };
                        loc(i as i64 + 1, name, parent, name)
                    })
                    .collect();

                let ordered = tree_order(&nodes);
                prop_assert_eq!(ordered.len(), nodes.len());

                let position: HashMap<i64, usize> = ordered
                    .iter()
                    .enumerate()
                    .map(|(pos, l)| (l.id.get(), pos))
                    .collect();
                for node in &nodes {
                    if let Some(parent) = node.parent_id {
                        prop_assert!(position[&parent.get()] < position[&node.id.get()]);
                    }
                }
            }
        }
    }
}
