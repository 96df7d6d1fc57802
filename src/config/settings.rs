use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub scylla: ScyllaConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct ScyllaConfig {
    pub nodes: Vec<String>,
    pub keyspace: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Longest path a session may grow to, root included.
    pub max_path_depth: usize,
    pub max_batch_size: usize,
}

/// Where a [`crate::client::GameClient`] finds the game API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        ClientConfig {
            base_url: env::var("STORY_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            timeout_ms: env::var("STORY_API_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            max_path_depth: 500,
            max_batch_size: 100,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let defaults = AppConfig::default();

        Ok(Settings {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|e| format!("Invalid SERVER_PORT: {}", e))?,
            },
            scylla: ScyllaConfig {
                nodes: env::var("SCYLLA_NODES")
                    .unwrap_or_else(|_| "localhost:9042".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                keyspace: env::var("SCYLLA_KEYSPACE").unwrap_or_else(|_| "story_paths".to_string()),
                username: env::var("SCYLLA_USERNAME").ok(),
                password: env::var("SCYLLA_PASSWORD").ok(),
            },
            app: AppConfig {
                max_path_depth: env::var("MAX_PATH_DEPTH")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_path_depth),
                max_batch_size: env::var("MAX_BATCH_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_batch_size),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.max_path_depth, 500);
        assert_eq!(config.max_batch_size, 100);
    }

    #[test]
    fn test_client_config_falls_back_to_localhost() {
        if env::var("STORY_API_URL").is_err() {
            assert_eq!(ClientConfig::from_env().base_url, "http://localhost:8080");
        }
    }
}
