//! Configuration for the scheduler binary.
//!
//! Scheduling settings and the repository list live in a TOML file; the
//! operator identity and API token come from the environment.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable naming the operator account.
///
/// The value doubles as the name of the fork remote and as the fork owner
/// in PR head refs.
pub const GITHUB_USER_VAR: &str = "GITHUB_USER";

/// Environment variable carrying the API token used for PR creation and CI
/// status queries.
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

const fn default_send_interval_days() -> u64 {
    1
}

const fn default_close_interval_hours() -> u64 {
    1
}

/// Scheduler configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Repositories to nudge, as `owner/name` slugs.
    pub repo_slugs: Vec<String>,
    /// Interval between empty-PR send passes, in days.
    #[serde(default = "default_send_interval_days")]
    pub send_interval_days: u64,
    /// Interval between cleanup passes, in hours.
    #[serde(default = "default_close_interval_hours")]
    pub close_interval_hours: u64,
}

/// Load and validate configuration from `path`.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    if config.repo_slugs.is_empty() {
        return Err(Error::Config(format!(
            "no repo_slugs configured in {}",
            path.display()
        )));
    }
    if config.send_interval_days == 0 || config.close_interval_hours == 0 {
        return Err(Error::Config(
            "send_interval_days and close_interval_hours must be at least 1".to_string(),
        ));
    }

    Ok(config)
}

/// Read the operator account name from the environment.
pub fn github_user() -> Result<String> {
    std::env::var(GITHUB_USER_VAR)
        .map_err(|_| Error::Config(format!("{GITHUB_USER_VAR} is not set")))
}

/// Read the API token from the environment.
pub fn github_token() -> Result<String> {
    std::env::var(GITHUB_TOKEN_VAR)
        .map_err(|_| Error::Config(format!("{GITHUB_TOKEN_VAR} is not set")))
}
