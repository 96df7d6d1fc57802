//! HTTP client and branch manager behavior against a mocked game API.

use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use story_paths::client::{ClientError, GameClient};
use story_paths::config::ClientConfig;
use story_paths::timeline::BranchManager;

fn create_test_client(base_url: &str) -> GameClient {
    let config = ClientConfig {
        base_url: base_url.to_string(),
        timeout_ms: 5000,
    };

    GameClient::new(&config).expect("Failed to create client")
}

fn node_json(session_id: Uuid, id: Uuid, parent: Option<Uuid>, depth: i32) -> Value {
    json!({
        "id": id,
        "sessionId": session_id,
        "content": format!("Scene at depth {}", depth),
        "choices": [],
        "kind": "narrative",
        "parentNodeId": parent,
        "depth": depth,
        "createdAt": Utc::now(),
    })
}

fn step_json(node_id: Uuid, step_order: i32) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "nodeId": node_id,
        "choiceId": Uuid::new_v4(),
        "choiceText": format!("Choice {}", step_order),
        "stepOrder": step_order,
        "createdAt": Utc::now(),
    })
}

fn history_json(session_id: Uuid, version: i32, path_ids: &[Uuid]) -> Value {
    let nodes: Vec<Value> = path_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let parent = i.checked_sub(1).map(|p| path_ids[p]);
            node_json(session_id, *id, parent, i as i32)
        })
        .collect();

    json!({
        "pathVersion": version,
        "currentPath": path_ids,
        "pathNodes": nodes,
        "allNodes": nodes,
    })
}

#[cfg(test)]
mod client_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_get_path_history() {
        let mock_server = MockServer::start().await;
        let session_id = Uuid::new_v4();
        let ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

        Mock::given(method("GET"))
            .and(path(format!("/api/game/sessions/{}/path-history", session_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(history_json(session_id, 2, &ids)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let history = client.get_path_history(session_id).await.unwrap();

        assert_eq!(history.path_version, 2);
        assert_eq!(history.current_path, ids);
        assert_eq!(history.path_nodes.len(), history.current_path.len());
        for (node, id) in history.path_nodes.iter().zip(&history.current_path) {
            assert_eq!(node.id, *id);
        }
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let mock_server = MockServer::start().await;
        let session_id = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path(format!("/api/game/sessions/{}/branches", session_id)))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "Resource not found" })),
            )
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let err = client.get_branches(session_id).await.unwrap_err();

        assert!(err.is_not_found());
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Resource not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let mock_server = MockServer::start().await;
        let session_id = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path(format!("/api/game/sessions/{}/path-history", session_id)))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.get_path_history(session_id).await;

        assert!(matches!(result, Err(ClientError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn test_choice_options_carry_availability() {
        let mock_server = MockServer::start().await;
        let session_id = Uuid::new_v4();
        let open = Uuid::new_v4();
        let locked = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path(format!("/api/game/sessions/{}/choices", session_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": open, "text": "Walk on", "available": true },
                {
                    "id": locked,
                    "text": "Lift the gate",
                    "requiredAttribute": "strength",
                    "requiredAttributeValue": 12,
                    "available": false
                }
            ])))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let options = client.get_choices(session_id).await.unwrap();

        assert_eq!(options.len(), 2);
        assert!(options[0].available);
        assert_eq!(options[1].choice.required_attribute_value, Some(12));
        assert!(!options[1].available);
    }
}

#[cfg(test)]
mod branch_manager_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_restore_branch_reloads_without_restored_branch() {
        let mock_server = MockServer::start().await;
        let session_id = Uuid::new_v4();
        let root = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let branch_id = Uuid::new_v4();
        let former_id = Uuid::new_v4();

        let branches_before = json!({
            "activeBranch": [step_json(second, 1)],
            "inactiveBranches": [{
                "branchId": branch_id,
                "paths": [step_json(first, 1)],
                "createdAt": Utc::now(),
                "isActive": false
            }],
            "branchPoints": []
        });
        let branches_after = json!({
            "activeBranch": [step_json(first, 1)],
            "inactiveBranches": [{
                "branchId": former_id,
                "paths": [step_json(second, 1)],
                "createdAt": Utc::now(),
                "isActive": false
            }],
            "branchPoints": []
        });

        Mock::given(method("GET"))
            .and(path(format!("/api/game/sessions/{}/path-history", session_id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(history_json(session_id, 1, &[root, second])),
            )
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/api/game/sessions/{}/path-history", session_id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(history_json(session_id, 2, &[root, first])),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/api/game/sessions/{}/branches", session_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(branches_before))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/api/game/sessions/{}/branches", session_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(branches_after))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path(format!(
                "/api/game/sessions/{}/branches/{}/restore",
                session_id, branch_id
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": session_id,
                "character": { "name": "Ayla", "attributes": {} },
                "gameState": {},
                "currentStoryNode": node_json(session_id, first, Some(root), 1),
                "activeBranchId": branch_id,
                "pathVersion": 2,
                "status": "active",
                "storyNodes": [],
                "storyPaths": [],
                "createdAt": Utc::now()
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut manager = BranchManager::new(create_test_client(&mock_server.uri()), session_id);
        manager.load_data().await.unwrap();

        assert_eq!(manager.list_branches()[0].branch_id, branch_id);
        manager.navigator_mut().select_step(0);
        assert!(manager.navigator().can_undo());

        manager.restore_branch(branch_id).await.unwrap();

        assert!(
            manager
                .list_branches()
                .iter()
                .all(|b| b.branch_id != branch_id)
        );
        assert_eq!(manager.path_history().current_path, vec![root, first]);
        assert_eq!(manager.navigator().key().path_version, 2);
        assert!(!manager.navigator().can_undo());
    }

    #[tokio::test]
    async fn test_failed_restore_keeps_loaded_state() {
        let mock_server = MockServer::start().await;
        let session_id = Uuid::new_v4();
        let root = Uuid::new_v4();
        let branch_id = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path(format!("/api/game/sessions/{}/path-history", session_id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(history_json(session_id, 0, &[root])),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/api/game/sessions/{}/branches", session_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "activeBranch": [],
                "inactiveBranches": [],
                "branchPoints": []
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/api/game/sessions/{}/branches/{}/restore",
                session_id, branch_id
            )))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "Database error" })),
            )
            .mount(&mock_server)
            .await;

        let mut manager = BranchManager::new(create_test_client(&mock_server.uri()), session_id);
        manager.load_data().await.unwrap();

        let result = manager.restore_branch(branch_id).await;

        assert!(matches!(result, Err(ClientError::Api { status: 500, .. })));
        assert_eq!(manager.path_history().current_path, vec![root]);
        assert_eq!(manager.last_error(), Some("API error: 500 - Database error"));
    }
}
