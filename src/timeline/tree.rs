use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::domain::StoryNode;

/// One laid-out node of the branch tree. `column` is the depth, `row` the
/// lane: the first child stays in its parent's lane, later children open new
/// lanes below.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub node_id: Uuid,
    pub parent_node_id: Option<Uuid>,
    pub column: usize,
    pub row: usize,
    pub on_active_path: bool,
    pub child_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BranchTree {
    nodes: Vec<TreeNode>,
}

impl BranchTree {
    pub fn layout(all_nodes: &[StoryNode], current_path: &[Uuid]) -> Self {
        let known: HashSet<Uuid> = all_nodes.iter().map(|n| n.id).collect();
        let active: HashSet<Uuid> = current_path.iter().copied().collect();

        let mut children: HashMap<Uuid, Vec<&StoryNode>> = HashMap::new();
        let mut roots = Vec::new();
        for node in all_nodes {
            match node.parent_node_id.filter(|p| known.contains(p)) {
                Some(parent) => children.entry(parent).or_default().push(node),
                None => roots.push(node),
            }
        }
        for siblings in children.values_mut() {
            // Active child first so the current path runs along one lane.
            siblings.sort_by_key(|n| (!active.contains(&n.id), n.created_at));
        }

        let mut nodes = Vec::with_capacity(all_nodes.len());
        let mut next_row = 0;
        let mut stack: Vec<(&StoryNode, usize, usize)> = Vec::new();

        for root in roots {
            stack.push((root, 0, next_row));
            next_row += 1;

            while let Some((node, column, row)) = stack.pop() {
                let kids = children.get(&node.id).map(Vec::as_slice).unwrap_or(&[]);
                nodes.push(TreeNode {
                    node_id: node.id,
                    parent_node_id: node.parent_node_id,
                    column,
                    row,
                    on_active_path: active.contains(&node.id),
                    child_count: kids.len(),
                });

                let mut lanes = Vec::with_capacity(kids.len());
                for (i, _) in kids.iter().enumerate() {
                    if i == 0 {
                        lanes.push(row);
                    } else {
                        lanes.push(next_row);
                        next_row += 1;
                    }
                }
                // Push in reverse so the first child is visited next.
                for (kid, lane) in kids.iter().zip(lanes).rev() {
                    stack.push((*kid, column + 1, lane));
                }
            }
        }

        BranchTree { nodes }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn get(&self, node_id: Uuid) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.node_id == node_id)
    }

    pub fn lane_count(&self) -> usize {
        self.nodes.iter().map(|n| n.row + 1).max().unwrap_or(0)
    }

    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.column + 1).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeKind;
    use chrono::{Duration, Utc};

    fn node(parent: Option<&StoryNode>, minutes: i64) -> StoryNode {
        StoryNode {
            id: Uuid::new_v4(),
            session_id: Uuid::nil(),
            content: String::new(),
            location: None,
            scene_description: None,
            choices: vec![],
            kind: NodeKind::Narrative,
            selected_choice_id: None,
            selected_choice_text: None,
            parent_node_id: parent.map(|p| p.id),
            depth: parent.map(|p| p.depth + 1).unwrap_or(0),
            created_at: Utc::now() + Duration::minutes(minutes),
        }
    }

    #[test]
    fn test_active_path_keeps_first_lane() {
        let root = node(None, 0);
        let abandoned = node(Some(&root), 1);
        let abandoned_child = node(Some(&abandoned), 2);
        let current = node(Some(&root), 3);

        let all = vec![
            root.clone(),
            abandoned.clone(),
            abandoned_child.clone(),
            current.clone(),
        ];
        let tree = BranchTree::layout(&all, &[root.id, current.id]);

        assert_eq!(tree.nodes().len(), 4);
        assert_eq!(tree.lane_count(), 2);
        assert_eq!(tree.depth(), 3);

        let current_laid = tree.get(current.id).unwrap();
        assert_eq!((current_laid.column, current_laid.row), (1, 0));
        assert!(current_laid.on_active_path);

        let abandoned_laid = tree.get(abandoned_child.id).unwrap();
        assert_eq!((abandoned_laid.column, abandoned_laid.row), (2, 1));
        assert!(!abandoned_laid.on_active_path);

        assert_eq!(tree.get(root.id).unwrap().child_count, 2);
    }

    #[test]
    fn test_empty_tree() {
        let tree = BranchTree::layout(&[], &[]);

        assert!(tree.nodes().is_empty());
        assert_eq!(tree.lane_count(), 0);
    }
}
