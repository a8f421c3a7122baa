//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{CiStatus, PullRequest};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    owner: String,
    repo: String,
    /// Token for raw HTTP requests (CI status checking)
    token: String,
    /// HTTP client for raw requests (CI status checking)
    http_client: Client,
}

impl GitHubService {
    /// Create a new GitHub service scoped to one repository.
    pub fn new(token: &str, owner: String, repo: String) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("ci-nudge")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            owner,
            repo,
            token: token.to_string(),
            http_client,
        })
    }

    /// Combined commit-status result (legacy status API, used by external
    /// CI services).
    ///
    /// Returns `None` when the repository has no statuses for the commit.
    async fn combined_status(&self, commit_sha: &str) -> Result<Option<CiStatus>> {
        #[derive(Deserialize)]
        struct CombinedStatus {
            state: String,
            total_count: u32,
        }

        let url = format!(
            "https://api.github.com/repos/{}/{}/commits/{commit_sha}/status",
            self.owner, self.repo
        );

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::CiStatus(format!("failed to fetch commit status: {e}")))?;

        if !response.status().is_success() {
            debug!(
                status = %response.status(),
                "commit status check returned non-success, assuming no statuses configured"
            );
            return Ok(None);
        }

        let status: CombinedStatus = response
            .json()
            .await
            .map_err(|e| Error::CiStatus(format!("failed to parse commit status: {e}")))?;

        if status.total_count == 0 {
            debug!("no commit statuses configured");
            return Ok(None);
        }

        debug!(state = %status.state, count = status.total_count, "commit status result");
        Ok(Some(CiStatus::parse(&status.state)))
    }

    /// Aggregate check-runs result (GitHub Actions API).
    ///
    /// Returns `None` when no check runs exist for the commit.
    async fn check_runs_status(&self, commit_sha: &str) -> Result<Option<CiStatus>> {
        #[derive(Deserialize)]
        struct CheckRunsResponse {
            total_count: u32,
            check_runs: Vec<CheckRun>,
        }

        #[derive(Deserialize)]
        struct CheckRun {
            status: String,
            conclusion: Option<String>,
        }

        let url = format!(
            "https://api.github.com/repos/{}/{}/commits/{commit_sha}/check-runs",
            self.owner, self.repo
        );

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::CiStatus(format!("failed to fetch check runs: {e}")))?;

        if !response.status().is_success() {
            debug!(
                status = %response.status(),
                "check runs returned non-success, assuming no checks configured"
            );
            return Ok(None);
        }

        let check_runs: CheckRunsResponse = response
            .json()
            .await
            .map_err(|e| Error::CiStatus(format!("failed to parse check runs: {e}")))?;

        if check_runs.total_count == 0 {
            debug!("no check runs configured");
            return Ok(None);
        }

        for run in &check_runs.check_runs {
            if run.status != "completed" {
                debug!(status = %run.status, "check run still in progress");
                return Ok(Some(CiStatus::Pending));
            }

            match run.conclusion.as_deref() {
                Some("success" | "neutral" | "skipped") => {}
                Some(conclusion) => {
                    debug!(conclusion = %conclusion, "check run failed");
                    return Ok(Some(CiStatus::Failure));
                }
                None => {
                    debug!("check run completed but no conclusion");
                    return Ok(Some(CiStatus::Failure));
                }
            }
        }

        debug!(count = check_runs.total_count, "all check runs passed");
        Ok(Some(CiStatus::Success))
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        title: pr.title.as_deref().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn create_pr(&self, head: &str, base: &str, title: &str) -> Result<PullRequest> {
        debug!(head, base, "creating PR");
        let pr = self
            .client
            .pulls(&self.owner, &self.repo)
            .create(title, head, base)
            .send()
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn ci_status(&self, commit_sha: &str) -> Result<CiStatus> {
        let statuses = self.combined_status(commit_sha).await?;
        let runs = self.check_runs_status(commit_sha).await?;

        // GitHub has two CI surfaces; a commit only counts as green once
        // every surface that reported anything reports success. Nothing
        // reported at all counts as pending.
        let status = match (statuses, runs) {
            (None, None) => CiStatus::Pending,
            (Some(status), None) | (None, Some(status)) => status,
            (Some(a), Some(b)) => {
                if a.is_success() {
                    b
                } else {
                    a
                }
            }
        };

        debug!(commit = %commit_sha, %status, "ci status");
        Ok(status)
    }
}
