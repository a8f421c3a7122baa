//! Hosted-platform services
//!
//! Provides the narrow PR/CI interface the empty-PR workflow depends on.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{CiStatus, PullRequest};
use async_trait::async_trait;

/// Hosted-repository operations consumed by the controller.
///
/// A service instance is scoped to a single `owner/name` repository.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Open a pull request from `head` (format `fork-owner:branch`) into
    /// `base` on the tracked repository, with `title`.
    async fn create_pr(&self, head: &str, base: &str, title: &str) -> Result<PullRequest>;

    /// Query CI status for a commit.
    ///
    /// Implementations must collapse whatever the service reports onto the
    /// closed [`CiStatus`] set; a commit nothing has reported against yet is
    /// `Pending`, never `Success`.
    async fn ci_status(&self, commit_sha: &str) -> Result<CiStatus>;
}
