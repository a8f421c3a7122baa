//! Error types for ci-nudge

use thiserror::Error;

/// Errors surfaced by ci-nudge operations.
///
/// Only `Config` is fatal; everything else aborts the current operation for
/// one repository and is retried on the next scheduled run.
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A git command exited non-zero.
    #[error("git command failed: {command}\nstderr: {stderr}")]
    Git {
        /// The command line that failed.
        command: String,
        /// Captured stderr from the failed command.
        stderr: String,
    },

    /// CI status could not be determined for a commit.
    #[error("ci status query failed: {0}")]
    CiStatus(String),

    /// The hosted platform rejected an API request.
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Filesystem error while managing working directories.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
