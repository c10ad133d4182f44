//! Service configuration
//!
//! Scoring thresholds are compile-time constants; only the HTTP service has
//! runtime settings, read from environment variables.

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listening port (`PORT`)
    pub port: u16,

    /// JSON file the score history is loaded from and saved to (`HISTORY_PATH`)
    pub history_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            history_path: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        let history_path = lookup("HISTORY_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self { port, history_path })
    }
}
