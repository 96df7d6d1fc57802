use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::{ClientError, ClientResult};
use crate::api::dto::{ChoiceOptionResponse, StartSessionRequest};
use crate::config::ClientConfig;
use crate::domain::{BranchIndex, Character, GameSession, GameState, PathHistory};
use crate::timeline::TimelineSource;

/// HTTP client for the game API
#[derive(Clone)]
pub struct GameClient {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl GameClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/game{}", self.base_url, path)
    }

    pub async fn start_session(
        &self,
        character: Character,
        game_state: Option<GameState>,
    ) -> ClientResult<GameSession> {
        let request = StartSessionRequest {
            character,
            game_state,
        };
        let builder = self.client.post(self.url("/sessions")).json(&request);
        self.send(builder).await
    }

    pub async fn get_session(&self, session_id: Uuid) -> ClientResult<GameSession> {
        self.call(Method::GET, &format!("/sessions/{}", session_id))
            .await
    }

    pub async fn get_path_history(&self, session_id: Uuid) -> ClientResult<PathHistory> {
        self.call(Method::GET, &format!("/sessions/{}/path-history", session_id))
            .await
    }

    pub async fn get_branches(&self, session_id: Uuid) -> ClientResult<BranchIndex> {
        self.call(Method::GET, &format!("/sessions/{}/branches", session_id))
            .await
    }

    pub async fn get_choices(&self, session_id: Uuid) -> ClientResult<Vec<ChoiceOptionResponse>> {
        self.call(Method::GET, &format!("/sessions/{}/choices", session_id))
            .await
    }

    pub async fn make_choice(&self, session_id: Uuid, choice_id: Uuid) -> ClientResult<GameSession> {
        self.call(
            Method::POST,
            &format!("/sessions/{}/choices/{}", session_id, choice_id),
        )
        .await
    }

    pub async fn go_back(&self, session_id: Uuid, node_id: Uuid) -> ClientResult<GameSession> {
        self.call(
            Method::POST,
            &format!("/sessions/{}/go-back/{}", session_id, node_id),
        )
        .await
    }

    pub async fn restore_branch(
        &self,
        session_id: Uuid,
        branch_id: Uuid,
    ) -> ClientResult<GameSession> {
        self.call(
            Method::POST,
            &format!("/sessions/{}/branches/{}/restore", session_id, branch_id),
        )
        .await
    }

    pub async fn end_session(&self, session_id: Uuid) -> ClientResult<GameSession> {
        self.call(Method::PUT, &format!("/sessions/{}/end", session_id))
            .await
    }

    async fn call<T: DeserializeOwned>(&self, method: Method, path: &str) -> ClientResult<T> {
        let builder = self.client.request(method, self.url(path));
        self.send(builder).await
    }

    async fn send<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout {
                    timeout_ms: self.timeout_ms,
                }
            } else {
                ClientError::Http(e)
            }
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Game API responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(body);
            warn!(status = status.as_u16(), error = %message, "Game API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse {
                message: format!("Failed to parse response: {}", e),
            })
    }
}

impl TimelineSource for GameClient {
    async fn fetch_path_history(&self, session_id: Uuid) -> ClientResult<PathHistory> {
        self.get_path_history(session_id).await
    }

    async fn fetch_branch_index(&self, session_id: Uuid) -> ClientResult<BranchIndex> {
        self.get_branches(session_id).await
    }

    async fn restore_branch(&self, session_id: Uuid, branch_id: Uuid) -> ClientResult<()> {
        GameClient::restore_branch(self, session_id, branch_id)
            .await
            .map(|_| ())
    }
}
