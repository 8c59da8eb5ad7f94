// src/config/models.rs
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Directory the JSON snapshot is written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_true")]
    pub show_details: bool,

    #[serde(default = "default_true")]
    pub save_snapshot: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_workers: default_max_workers(),
            user_agent: default_user_agent(),
            output_dir: default_output_dir(),
            show_details: true,
            save_snapshot: true,
        }
    }
}

impl PollerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.max_workers == 0 {
            bail!("max_workers must be greater than zero");
        }
        if self.user_agent.trim().is_empty() {
            bail!("user_agent must not be empty");
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_workers() -> usize {
    5
}

fn default_user_agent() -> String {
    format!("{}/{} (Health Check Bot)", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}
