//! Environment-backed configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use log::debug;

/// Default sqlite database location
const DEFAULT_DATABASE_PATH: &str = "habits.db";

/// Runtime configuration loaded from the environment
///
/// Transport credentials (bot tokens etc.) belong to whatever owns the chat
/// protocol and are not read here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the sqlite database file
    pub database_path: String,
}

impl Config {
    /// Load configuration from `.env` and the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());
        debug!("Using database at {database_path}");

        Ok(Self { database_path })
    }
}
