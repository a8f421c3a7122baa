//! Per-repository empty-PR lifecycle.
//!
//! A [`RepoController`] owns one repository's local clone and drives the
//! full workflow: clone, track the operator's fork, open empty-commit PRs,
//! and delete branches once their CI run comes back green.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::config;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{CiStatus, EmptyPr, PullRequest, RecordState, RepoSlug};
use crate::vcs::VcsClient;

/// Timestamp format used in branch names and commit messages.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Remote name the upstream repository is cloned under.
const UPSTREAM_REMOTE: &str = "origin";

/// Branch name for an empty-commit PR created at `timestamp`.
///
/// Names are unique per run at second granularity; two sends within the
/// same second would collide (known edge case, not handled).
pub fn empty_commit_branch(timestamp: DateTime<Utc>) -> String {
    format!("empty-commit-{}", timestamp.format(TIMESTAMP_FORMAT))
}

/// Commit message, doubling as the PR title, for an empty commit created at
/// `timestamp`.
pub fn empty_commit_message(timestamp: DateTime<Utc>) -> String {
    format!(
        "Empty commit to trigger CI at {}",
        timestamp.format(TIMESTAMP_FORMAT)
    )
}

/// Manages one repository's empty-commit PR lifecycle end-to-end.
pub struct RepoController {
    slug: RepoSlug,
    /// Owns the on-disk clone; the directory is removed when the controller
    /// is dropped.
    _workdir: TempDir,
    repo_dir: PathBuf,
    default_branch: String,
    operator: String,
    vcs: Arc<dyn VcsClient>,
    platform: Arc<dyn PlatformService>,
    /// Outstanding empty PRs, keyed by commit SHA. Entries are removed once
    /// their branch is confirmed deleted.
    records: BTreeMap<String, EmptyPr>,
}

impl RepoController {
    /// Clone the repository and register the operator's fork as a remote.
    ///
    /// The operator identity is read from `GITHUB_USER`; a missing value is
    /// fatal at construction.
    pub async fn init(
        slug: RepoSlug,
        vcs: Arc<dyn VcsClient>,
        platform: Arc<dyn PlatformService>,
    ) -> Result<Self> {
        let operator = config::github_user()?;
        Self::init_with_operator(slug, operator, vcs, platform).await
    }

    /// Like [`Self::init`], with the operator identity supplied by the
    /// caller instead of read from the environment.
    pub async fn init_with_operator(
        slug: RepoSlug,
        operator: String,
        vcs: Arc<dyn VcsClient>,
        platform: Arc<dyn PlatformService>,
    ) -> Result<Self> {
        let workdir = tempfile::Builder::new().prefix("ci-nudge-").tempdir()?;
        let repo_dir = workdir.path().join(&slug.name);

        info!(repo = %slug, dir = %repo_dir.display(), "cloning");
        vcs.clone_repo(&slug.clone_url(), &repo_dir).await?;

        let default_branch = vcs.current_branch(&repo_dir).await?;
        if default_branch.is_empty() {
            return Err(Error::Config(format!(
                "{slug}: clone left no branch checked out"
            )));
        }

        vcs.add_remote(&repo_dir, &operator, &slug.fork_push_url(&operator))
            .await?;

        debug!(repo = %slug, %default_branch, %operator, "controller ready");
        Ok(Self {
            slug,
            _workdir: workdir,
            repo_dir,
            default_branch,
            operator,
            vcs,
            platform,
            records: BTreeMap::new(),
        })
    }

    /// The slug this controller tracks.
    pub const fn slug(&self) -> &RepoSlug {
        &self.slug
    }

    /// Path of the local working copy.
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Default branch captured at clone time.
    pub fn default_branch(&self) -> &str {
        &self.default_branch
    }

    /// Outstanding empty-PR records, in commit-SHA order.
    pub fn records(&self) -> impl Iterator<Item = &EmptyPr> {
        self.records.values()
    }

    /// Number of outstanding empty-PR records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Open a new empty-commit PR stamped with the current time.
    pub async fn send_empty_pr(&mut self) -> Result<PullRequest> {
        self.send_empty_pr_at(Utc::now()).await
    }

    /// Open a new empty-commit PR stamped with `now`.
    ///
    /// At most one PR is created per call. If any step fails, no record is
    /// added and the controller's state is unchanged, so the next scheduled
    /// run retries from a clean slate.
    pub async fn send_empty_pr_at(&mut self, now: DateTime<Utc>) -> Result<PullRequest> {
        let branch = empty_commit_branch(now);
        let message = empty_commit_message(now);

        self.vcs.fetch_all(&self.repo_dir).await?;
        self.vcs
            .checkout_remote_branch(&self.repo_dir, UPSTREAM_REMOTE, &self.default_branch)
            .await?;
        self.vcs.create_branch(&self.repo_dir, &branch).await?;
        self.vcs.commit_empty(&self.repo_dir, &message).await?;
        let commit_sha = self.vcs.head_commit(&self.repo_dir).await?;
        self.vcs
            .push_branch(&self.repo_dir, &self.operator, &branch)
            .await?;

        let head = format!("{}:{branch}", self.operator);
        let pr = self
            .platform
            .create_pr(&head, &self.default_branch, &message)
            .await?;

        info!(
            repo = %self.slug,
            %branch,
            commit = %commit_sha,
            pr_number = pr.number,
            "opened empty PR"
        );
        self.records.insert(
            commit_sha.clone(),
            EmptyPr {
                branch,
                commit_sha,
                state: RecordState::Open,
            },
        );
        Ok(pr)
    }

    /// CI status for a commit, as reported by the platform.
    pub async fn check_ci_status(&self, commit_sha: &str) -> Result<CiStatus> {
        self.platform.ci_status(commit_sha).await
    }

    /// Delete branches whose CI run succeeded and drop their records.
    ///
    /// A record is removed only after its branch deletion is confirmed, so a
    /// failed deletion is retried on the next pass. Records whose status is
    /// anything but `success` (including failed queries) are left untouched
    /// for the next poll. Returns the number of branches deleted.
    pub async fn close_succeeded_prs(&mut self) -> usize {
        let shas: Vec<String> = self.records.keys().cloned().collect();
        let mut closed = 0;

        for sha in shas {
            let status = match self.platform.ci_status(&sha).await {
                Ok(status) => status,
                Err(err) => {
                    warn!(repo = %self.slug, commit = %sha, error = %err, "ci status query failed");
                    continue;
                }
            };

            if !status.is_success() {
                debug!(repo = %self.slug, commit = %sha, %status, "ci not green yet");
                continue;
            }

            let Some(record) = self.records.get_mut(&sha) else {
                continue;
            };
            record.state = RecordState::Closing;
            let branch = record.branch.clone();

            match self
                .vcs
                .delete_remote_branch(&self.repo_dir, &self.operator, &branch)
                .await
            {
                Ok(()) => {
                    info!(repo = %self.slug, %branch, commit = %sha, "deleted branch after green CI");
                    if let Some(record) = self.records.get_mut(&sha) {
                        record.state = RecordState::Closed;
                    }
                    self.records.remove(&sha);
                    closed += 1;
                }
                Err(err) => {
                    warn!(
                        repo = %self.slug,
                        %branch,
                        error = %err,
                        "branch deletion failed, keeping record for retry"
                    );
                    if let Some(record) = self.records.get_mut(&sha) {
                        record.state = RecordState::Open;
                    }
                }
            }
        }

        closed
    }
}
