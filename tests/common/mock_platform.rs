//! Mock platform service for testing

use async_trait::async_trait;
use ci_nudge::error::{Error, Result};
use ci_nudge::platform::PlatformService;
use ci_nudge::types::{CiStatus, PullRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Auto-incrementing PR numbers
/// - Call tracking for verification
/// - Configurable CI status per commit SHA
/// - Error injection for failure path testing
pub struct MockPlatformService {
    next_pr_number: AtomicU64,
    ci_responses: Mutex<HashMap<String, CiStatus>>,
    // Call tracking
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    ci_status_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_create_pr: Mutex<Option<String>>,
    error_on_ci_status: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock
    pub fn new() -> Self {
        Self {
            next_pr_number: AtomicU64::new(1),
            ci_responses: Mutex::new(HashMap::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            ci_status_calls: Mutex::new(Vec::new()),
            error_on_create_pr: Mutex::new(None),
            error_on_ci_status: Mutex::new(None),
        }
    }

    /// Set the CI status reported for a specific commit.
    ///
    /// Commits with no configured status report `pending`.
    pub fn set_ci_status(&self, commit_sha: &str, status: CiStatus) {
        self.ci_responses
            .lock()
            .unwrap()
            .insert(commit_sha.to_string(), status);
    }

    /// Make `create_pr` return an error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `ci_status` return an error
    pub fn fail_ci_status(&self, msg: &str) {
        *self.error_on_ci_status.lock().unwrap() = Some(msg.to_string());
    }

    /// Clear an injected `ci_status` error
    pub fn clear_ci_status_error(&self) {
        *self.error_on_ci_status.lock().unwrap() = None;
    }

    // === Call verification methods ===

    /// Get all `create_pr` calls
    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// Get all commits `ci_status` was queried for
    pub fn get_ci_status_calls(&self) -> Vec<String> {
        self.ci_status_calls.lock().unwrap().clone()
    }

    /// Assert that `create_pr` was called with specific head and base
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pr({head}, {base}) but got: {calls:?}"
        );
    }
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn create_pr(&self, head: &str, base: &str, title: &str) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
        });

        // Check for injected error
        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/test/repo/pull/{number}"),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            title: title.to_string(),
        })
    }

    async fn ci_status(&self, commit_sha: &str) -> Result<CiStatus> {
        self.ci_status_calls
            .lock()
            .unwrap()
            .push(commit_sha.to_string());

        // Check for injected error
        if let Some(msg) = self.error_on_ci_status.lock().unwrap().as_ref() {
            return Err(Error::CiStatus(msg.clone()));
        }

        let responses = self.ci_responses.lock().unwrap();
        Ok(responses
            .get(commit_sha)
            .cloned()
            .unwrap_or(CiStatus::Pending))
    }
}
