//! Whole-tree edit operations
//!
//! Every edit returns a new tree; the input is left untouched. Any interval
//! sequence flattened from the old tree is stale afterwards.

use super::node::WorkoutNode;

/// Finds the node with the given id anywhere in the tree.
#[must_use]
pub fn find_node<'a>(nodes: &'a [WorkoutNode], id: &str) -> Option<&'a WorkoutNode> {
    nodes.iter().find_map(|node| {
        if node.id() == id {
            return Some(node);
        }
        match node {
            WorkoutNode::Combo(combo) => find_node(&combo.children, id),
            WorkoutNode::Exercise(_) => None,
        }
    })
}

/// Returns a copy of the tree with the node sharing `replacement`'s id
/// swapped for `replacement`.
///
/// The replacement keeps its own children when it is a combo. Trees without
/// a matching id come back unchanged.
#[must_use]
pub fn replace_node(nodes: &[WorkoutNode], replacement: &WorkoutNode) -> Vec<WorkoutNode> {
    nodes
        .iter()
        .map(|node| {
            if node.id() == replacement.id() {
                return replacement.clone();
            }
            match node {
                WorkoutNode::Combo(combo) => {
                    let mut combo = combo.clone();
                    combo.children = replace_node(&combo.children, replacement);
                    WorkoutNode::Combo(combo)
                }
                WorkoutNode::Exercise(_) => node.clone(),
            }
        })
        .collect()
}

/// Returns a copy of the tree with the node `id` (and its subtree) removed
/// at every depth.
#[must_use]
pub fn remove_node(nodes: &[WorkoutNode], id: &str) -> Vec<WorkoutNode> {
    nodes
        .iter()
        .filter(|node| node.id() != id)
        .map(|node| match node {
            WorkoutNode::Combo(combo) => {
                let mut combo = combo.clone();
                combo.children = remove_node(&combo.children, id);
                WorkoutNode::Combo(combo)
            }
            WorkoutNode::Exercise(_) => node.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::node::{Combo, Exercise};

    fn exercise(id: &str, name: &str) -> WorkoutNode {
        WorkoutNode::Exercise(Exercise {
            id: id.to_string(),
            name: name.to_string(),
            duration: 20,
            rest: 10,
            repetitions: 1,
        })
    }

    fn combo(id: &str, children: Vec<WorkoutNode>) -> WorkoutNode {
        WorkoutNode::Combo(Combo {
            id: id.to_string(),
            name: "Circuit".to_string(),
            repetitions: 2,
            children,
        })
    }

    fn sample_tree() -> Vec<WorkoutNode> {
        vec![
            exercise("a", "Jumping Jacks"),
            combo("c1", vec![exercise("b", "Squats"), combo("c2", vec![exercise("c", "Push-ups")])]),
        ]
    }

    #[test]
    fn test_find_nested() {
        let tree = sample_tree();
        assert_eq!(find_node(&tree, "c").map(WorkoutNode::name), Some("Push-ups"));
        assert!(find_node(&tree, "missing").is_none());
    }

    #[test]
    fn test_replace_nested_exercise() {
        let tree = sample_tree();
        let updated = replace_node(&tree, &exercise("c", "Diamond Push-ups"));
        assert_eq!(
            find_node(&updated, "c").map(WorkoutNode::name),
            Some("Diamond Push-ups")
        );
        // Input untouched
        assert_eq!(find_node(&tree, "c").map(WorkoutNode::name), Some("Push-ups"));
    }

    #[test]
    fn test_replace_unknown_id_is_identity() {
        let tree = sample_tree();
        assert_eq!(replace_node(&tree, &exercise("zzz", "Ghost")), tree);
    }

    #[test]
    fn test_remove_top_level() {
        let updated = remove_node(&sample_tree(), "a");
        assert_eq!(updated.len(), 1);
        assert!(find_node(&updated, "a").is_none());
    }

    #[test]
    fn test_remove_combo_removes_subtree() {
        let updated = remove_node(&sample_tree(), "c2");
        assert!(find_node(&updated, "c2").is_none());
        assert!(find_node(&updated, "c").is_none());
        assert!(find_node(&updated, "b").is_some());
    }
}
