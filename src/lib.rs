pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod generator;
pub mod repositories;
pub mod services;
pub mod timeline;
pub mod utils;

pub use client::GameClient;
pub use config::Settings;
pub use db::DbClient;
