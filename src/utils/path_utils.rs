use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::{BranchPoint, StoryNode, StoryPath};

/// Order path records by step.
pub fn sorted_steps(paths: &[StoryPath]) -> Vec<StoryPath> {
    let mut steps = paths.to_vec();
    steps.sort_by_key(|p| p.step_order);
    steps
}

/// Node ids of a path from the root node to its leaf.
pub fn assemble_path(root_node_id: Uuid, paths: &[StoryPath]) -> Vec<Uuid> {
    let mut node_ids = Vec::with_capacity(paths.len() + 1);
    node_ids.push(root_node_id);
    node_ids.extend(sorted_steps(paths).iter().map(|p| p.node_id));
    node_ids
}

/// Steps of `paths` up to and including the one that reached `node_id`.
///
/// Returns an empty prefix for the root and `None` when the node is not on
/// the path.
pub fn prefix_through(
    root_node_id: Uuid,
    paths: &[StoryPath],
    node_id: Uuid,
) -> Option<Vec<StoryPath>> {
    if node_id == root_node_id {
        return Some(Vec::new());
    }

    let steps = sorted_steps(paths);
    let position = steps.iter().position(|p| p.node_id == node_id)?;
    Some(steps[..=position].to_vec())
}

/// Whether the node sequence of `prefix` is a prefix of `path`.
pub fn is_path_prefix(prefix: &[StoryPath], path: &[StoryPath]) -> bool {
    if prefix.len() > path.len() {
        return false;
    }

    sorted_steps(prefix)
        .iter()
        .zip(sorted_steps(path).iter())
        .all(|(a, b)| a.node_id == b.node_id)
}

/// Whether a superseded path adds anything over `others`: it does unless
/// one of them already starts with the same nodes.
pub fn worth_retaining(paths: &[StoryPath], others: &[&[StoryPath]]) -> bool {
    !others.iter().any(|other| is_path_prefix(paths, other))
}

/// Validate path depth
pub fn validate_path_depth(depth: usize, max_depth: usize) -> Result<(), String> {
    if depth > max_depth {
        return Err(format!(
            "Path depth {} exceeds maximum allowed depth {}",
            depth, max_depth
        ));
    }
    Ok(())
}

/// Nodes with two or more distinct continuations across `branches`.
///
/// Each branch is read as root followed by its steps; the step record kept
/// for a continuation is the first one seen. Output order follows the first
/// appearance of each node.
pub fn find_branch_points(root_node_id: Uuid, branches: &[&[StoryPath]]) -> Vec<BranchPoint> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut continuations: HashMap<Uuid, Vec<StoryPath>> = HashMap::new();

    for paths in branches {
        let mut from = root_node_id;
        for step in sorted_steps(paths) {
            let next = step.node_id;
            let entry = continuations.entry(from).or_insert_with(|| {
                order.push(from);
                Vec::new()
            });
            if !entry.iter().any(|p| p.node_id == next) {
                entry.push(step);
            }
            from = next;
        }
    }

    order
        .into_iter()
        .filter_map(|node_id| {
            let paths = continuations.remove(&node_id)?;
            (paths.len() >= 2).then(|| BranchPoint {
                node_id,
                branch_count: paths.len(),
                paths,
            })
        })
        .collect()
}

/// Nodes on the path whose recorded selection disagrees with the path,
/// already corrected. The leaf ends up with no selection.
pub fn selection_updates(
    root_node_id: Uuid,
    paths: &[StoryPath],
    nodes: &HashMap<Uuid, StoryNode>,
) -> Vec<StoryNode> {
    let node_ids = assemble_path(root_node_id, paths);
    let steps = sorted_steps(paths);
    let mut updates = Vec::new();

    for (index, node_id) in node_ids.iter().enumerate() {
        let Some(node) = nodes.get(node_id) else {
            continue;
        };

        let wanted = steps
            .get(index)
            .map(|step| (step.choice_id, step.choice_text.clone()));

        let current = node
            .selected_choice_id
            .map(|id| (id, node.selected_choice_text.clone().unwrap_or_default()));

        if wanted != current {
            let mut updated = node.clone();
            match wanted {
                Some((choice_id, choice_text)) => {
                    updated.selected_choice_id = Some(choice_id);
                    updated.selected_choice_text = Some(choice_text);
                }
                None => updated.clear_selection(),
            }
            updates.push(updated);
        }
    }

    updates
}
