//! Core types for ci-nudge

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A hosted repository identified by an `owner/name` slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSlug {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoSlug {
    /// Parse an `owner/name` slug.
    pub fn parse(slug: &str) -> Result<Self> {
        match slug.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(Error::Config(format!(
                "invalid repository slug {slug:?}, expected owner/name"
            ))),
        }
    }

    /// HTTPS clone URL of the upstream repository.
    pub fn clone_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.owner, self.name)
    }

    /// SSH push URL of the operator's fork of this repository.
    pub fn fork_push_url(&self, operator: &str) -> String {
        format!("git@github.com:{operator}/{}.git", self.name)
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// CI outcome reported for a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CiStatus {
    /// Every reported check passed
    Success,
    /// Checks are still running (or nothing has reported yet)
    Pending,
    /// At least one check failed
    Failure,
    /// The CI system itself errored
    Error,
    /// The service returned a status outside the closed set
    Unknown(String),
}

impl CiStatus {
    /// Map a status string from the CI service onto the closed status set.
    ///
    /// Anything unrecognized is carried as [`Self::Unknown`] and treated as
    /// not-success by the cleanup pass.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "success" => Self::Success,
            "pending" => Self::Pending,
            "failure" => Self::Failure,
            "error" => Self::Error,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Whether the cleanup pass may delete the branch behind this status.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for CiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Pending => write!(f, "pending"),
            Self::Failure => write!(f, "failure"),
            Self::Error => write!(f, "error"),
            Self::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

/// Lifecycle state of one tracked empty-PR record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// PR sent, CI outcome not yet observed as success
    Open,
    /// CI succeeded, branch deletion in flight
    Closing,
    /// Branch confirmed deleted
    Closed,
}

/// One outstanding empty-commit PR, tracked from "PR sent" until its branch
/// is confirmed deleted from the operator's fork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyPr {
    /// Branch the empty commit was pushed to
    pub branch: String,
    /// The empty commit's SHA (what CI reports against)
    pub commit_sha: String,
    /// Current lifecycle state
    pub state: RecordState,
}

/// A created pull request as reported by the hosted platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head ref the PR was opened from (`fork-owner:branch`)
    pub head_ref: String,
    /// PR title
    pub title: String,
}
