pub mod settings;

pub use settings::{AppConfig, ClientConfig, ScyllaConfig, ServerConfig, Settings};
