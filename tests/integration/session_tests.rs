// Session lifecycle against a live ScyllaDB

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use story_paths::{
        config::{AppConfig, ScyllaConfig},
        db::{DbClient, DbError},
        domain::{Character, GameState},
        generator::{SceneGenerator, ScriptedGenerator},
        repositories::{BranchRepository, NodeRepository, SessionRepository},
        services::{BranchService, ChoiceService, SessionService},
    };

    struct Services {
        sessions: Arc<SessionService>,
        choices: ChoiceService,
        branches: BranchService,
    }

    async fn setup_test_services() -> Services {
        let scylla_config = ScyllaConfig {
            nodes: vec!["localhost:9042".to_string()],
            keyspace: "story_paths_test".to_string(),
            username: None,
            password: None,
        };

        let app_config = AppConfig::default();

        let db_client = DbClient::new(&scylla_config)
            .await
            .expect("Failed to connect to test database");

        let session_repo = SessionRepository::new(db_client.clone());
        let node_repo = NodeRepository::new(db_client.clone());
        let branch_repo = BranchRepository::new(db_client);
        let generator: Arc<dyn SceneGenerator> = Arc::new(ScriptedGenerator::default());

        let sessions = Arc::new(SessionService::new(
            session_repo.clone(),
            node_repo.clone(),
            branch_repo.clone(),
            generator.clone(),
        ));

        Services {
            choices: ChoiceService::new(
                session_repo.clone(),
                node_repo.clone(),
                branch_repo.clone(),
                sessions.clone(),
                generator,
                app_config.clone(),
            ),
            branches: BranchService::new(
                session_repo,
                node_repo,
                branch_repo,
                sessions.clone(),
                app_config,
            ),
            sessions,
        }
    }

    fn hero() -> Character {
        Character {
            name: "Ayla".to_string(),
            character_class: Some("ranger".to_string()),
            attributes: HashMap::from([("strength".to_string(), 8)]),
        }
    }

    #[tokio::test]
    #[ignore] // Requires running ScyllaDB
    async fn test_start_session() {
        let services = setup_test_services().await;

        let session = services
            .sessions
            .start_session(hero(), GameState::default())
            .await
            .unwrap();

        let history = services.sessions.get_path_history(session.id).await.unwrap();
        assert_eq!(history.current_path, vec![session.current_story_node.id]);
        assert_eq!(history.path_nodes.len(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires running ScyllaDB
    async fn test_choice_extends_path() {
        let services = setup_test_services().await;
        let session = services
            .sessions
            .start_session(hero(), GameState::default())
            .await
            .unwrap();

        let choice = session.current_story_node.choices[0].clone();
        let updated = services
            .choices
            .make_choice(session.id, choice.id)
            .await
            .unwrap();

        assert_eq!(updated.story_paths.len(), 1);
        assert_eq!(updated.story_paths[0].step_order, 1);
        assert_eq!(updated.story_paths[0].choice_id, choice.id);
        assert_eq!(
            updated.current_story_node.parent_node_id,
            Some(session.current_story_node.id)
        );

        let history = services.sessions.get_path_history(session.id).await.unwrap();
        assert_eq!(history.current_path.len(), 2);
        assert_eq!(
            history.path_nodes[0].selected_choice_id,
            Some(choice.id)
        );
    }

    #[tokio::test]
    #[ignore] // Requires running ScyllaDB
    async fn test_locked_choice_is_rejected() {
        let services = setup_test_services().await;
        let session = services
            .sessions
            .start_session(hero(), GameState::default())
            .await
            .unwrap();

        let locked = session
            .current_story_node
            .choices
            .iter()
            .find(|c| c.required_attribute_value.is_some())
            .cloned()
            .unwrap();

        let result = services.choices.make_choice(session.id, locked.id).await;
        assert!(matches!(result, Err(DbError::InvalidData(_))));
    }

    #[tokio::test]
    #[ignore] // Requires running ScyllaDB
    async fn test_go_back_and_restore_branch() {
        let services = setup_test_services().await;
        let session = services
            .sessions
            .start_session(hero(), GameState::default())
            .await
            .unwrap();
        let root = session.current_story_node.clone();

        let first = services
            .choices
            .make_choice(session.id, root.choices[0].id)
            .await
            .unwrap();
        let first_leaf = first.current_story_node.clone();

        let rewound = services.branches.go_back(session.id, root.id).await.unwrap();
        assert_eq!(rewound.current_story_node.id, root.id);
        assert!(rewound.story_paths.is_empty());
        assert_eq!(rewound.path_version, 1);

        let second = services
            .choices
            .make_choice(session.id, root.choices[1].id)
            .await
            .unwrap();

        let index = services.branches.get_branch_index(session.id).await.unwrap();
        assert_eq!(index.active_branch.len(), 1);
        assert_eq!(index.inactive_branches.len(), 1);
        assert_eq!(index.branch_points.len(), 1);
        assert_eq!(index.branch_points[0].node_id, root.id);
        assert_eq!(index.branch_points[0].branch_count, 2);

        let abandoned = index.inactive_branches[0].branch_id;
        let restored = services
            .branches
            .restore_branch(session.id, abandoned)
            .await
            .unwrap();
        assert_eq!(restored.current_story_node.id, first_leaf.id);
        assert_eq!(restored.active_branch_id, abandoned);

        let index = services.branches.get_branch_index(session.id).await.unwrap();
        assert!(index.inactive_branches.iter().all(|b| b.branch_id != abandoned));
        assert_eq!(
            index.inactive_branches[0].paths[0].node_id,
            second.current_story_node.id
        );
    }

    #[tokio::test]
    #[ignore] // Requires running ScyllaDB
    async fn test_ended_session_rejects_choices() {
        let services = setup_test_services().await;
        let session = services
            .sessions
            .start_session(hero(), GameState::default())
            .await
            .unwrap();

        let ended = services.sessions.end_session(session.id).await.unwrap();
        assert!(ended.ended_at.is_some());

        let result = services
            .choices
            .make_choice(session.id, session.current_story_node.choices[0].id)
            .await;
        assert!(matches!(result, Err(DbError::Conflict(_))));
    }
}
