//! Version-control operations
//!
//! Abstracts the git command line behind a narrow trait so the controller
//! can be driven by an in-memory fake in tests.

mod git;

pub use git::GitCli;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// The version-control operations the empty-PR workflow depends on.
///
/// Every method maps onto a single git invocation; a non-zero exit becomes
/// [`crate::error::Error::Git`] and aborts the current operation only.
#[async_trait]
pub trait VcsClient: Send + Sync {
    /// Clone `url` into `dest`.
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// Name of the branch currently checked out in `repo_dir`.
    async fn current_branch(&self, repo_dir: &Path) -> Result<String>;

    /// Register an additional remote on the clone.
    async fn add_remote(&self, repo_dir: &Path, name: &str, url: &str) -> Result<()>;

    /// Refresh all remote-tracking references.
    async fn fetch_all(&self, repo_dir: &Path) -> Result<()>;

    /// Check out the tip of `branch` as tracked by `remote`.
    async fn checkout_remote_branch(
        &self,
        repo_dir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<()>;

    /// Create and switch to a new local branch.
    async fn create_branch(&self, repo_dir: &Path, name: &str) -> Result<()>;

    /// Record a commit with no file changes.
    async fn commit_empty(&self, repo_dir: &Path, message: &str) -> Result<()>;

    /// SHA of the commit at HEAD.
    async fn head_commit(&self, repo_dir: &Path) -> Result<String>;

    /// Push `branch` to `remote`.
    async fn push_branch(&self, repo_dir: &Path, remote: &str, branch: &str) -> Result<()>;

    /// Delete `branch` from `remote` (a delete-ref push).
    async fn delete_remote_branch(
        &self,
        repo_dir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<()>;
}
