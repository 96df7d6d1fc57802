// Prepared query statements for ScyllaDB operations

// game_sessions queries
pub const INSERT_SESSION: &str = r#"
    INSERT INTO game_sessions (
        session_id, character, game_state, root_node_id, current_node_id,
        active_branch_id, path_version, status, created_at, ended_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_SESSION: &str = r#"
    SELECT session_id, character, game_state, root_node_id, current_node_id,
           active_branch_id, path_version, status, created_at, ended_at
    FROM game_sessions
    WHERE session_id = ?
"#;

pub const UPDATE_SESSION_POSITION: &str = r#"
    UPDATE game_sessions
    SET current_node_id = ?, active_branch_id = ?, path_version = ?, game_state = ?
    WHERE session_id = ?
"#;

pub const UPDATE_SESSION_STATUS: &str = r#"
    UPDATE game_sessions
    SET status = ?, ended_at = ?
    WHERE session_id = ?
"#;

// story_nodes queries
pub const INSERT_NODE: &str = r#"
    INSERT INTO story_nodes (
        session_id, node_id, parent_node_id, depth, kind, kind_data,
        content, location, scene_description, choices,
        selected_choice_id, selected_choice_text, created_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_NODE: &str = r#"
    SELECT session_id, node_id, parent_node_id, depth, kind, kind_data,
           content, location, scene_description, choices,
           selected_choice_id, selected_choice_text, created_at
    FROM story_nodes
    WHERE session_id = ? AND node_id = ?
"#;

pub const SELECT_NODES_BY_SESSION: &str = r#"
    SELECT session_id, node_id, parent_node_id, depth, kind, kind_data,
           content, location, scene_description, choices,
           selected_choice_id, selected_choice_text, created_at
    FROM story_nodes
    WHERE session_id = ?
"#;

pub const UPDATE_NODE_SELECTION: &str = r#"
    UPDATE story_nodes
    SET selected_choice_id = ?, selected_choice_text = ?
    WHERE session_id = ? AND node_id = ?
"#;

// session_branches queries
pub const INSERT_BRANCH: &str = r#"
    INSERT INTO session_branches (session_id, branch_id, created_at, is_active)
    VALUES (?, ?, ?, ?)
"#;

pub const SELECT_BRANCHES_BY_SESSION: &str = r#"
    SELECT session_id, branch_id, created_at, is_active
    FROM session_branches
    WHERE session_id = ?
"#;

pub const SELECT_BRANCH: &str = r#"
    SELECT session_id, branch_id, created_at, is_active
    FROM session_branches
    WHERE session_id = ? AND branch_id = ?
"#;

pub const UPDATE_BRANCH_ACTIVE: &str = r#"
    UPDATE session_branches
    SET is_active = ?
    WHERE session_id = ? AND branch_id = ?
"#;

pub const DELETE_BRANCH: &str = r#"
    DELETE FROM session_branches
    WHERE session_id = ? AND branch_id = ?
"#;

// path_steps queries
pub const INSERT_PATH: &str = r#"
    INSERT INTO path_steps (
        session_id, branch_id, step_order, path_id, node_id,
        choice_id, choice_text, created_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const SELECT_PATHS_BY_SESSION: &str = r#"
    SELECT session_id, branch_id, step_order, path_id, node_id,
           choice_id, choice_text, created_at
    FROM path_steps
    WHERE session_id = ?
"#;

pub const SELECT_PATHS_BY_BRANCH: &str = r#"
    SELECT session_id, branch_id, step_order, path_id, node_id,
           choice_id, choice_text, created_at
    FROM path_steps
    WHERE session_id = ? AND branch_id = ?
"#;

pub const DELETE_PATHS_BY_BRANCH: &str = r#"
    DELETE FROM path_steps
    WHERE session_id = ? AND branch_id = ?
"#;
