//! In-memory [`VcsClient`] fake with call recording and error injection.

use async_trait::async_trait;
use ci_nudge::error::{Error, Result};
use ci_nudge::vcs::VcsClient;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

/// A single recorded VCS invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    /// `clone_repo` with url and destination
    Clone {
        url: String,
        dest: String,
    },
    CurrentBranch,
    /// `add_remote` with remote name and url
    AddRemote {
        name: String,
        url: String,
    },
    FetchAll,
    /// `checkout_remote_branch`
    CheckoutRemoteBranch {
        remote: String,
        branch: String,
    },
    CreateBranch {
        name: String,
    },
    CommitEmpty {
        message: String,
    },
    HeadCommit,
    Push {
        remote: String,
        branch: String,
    },
    DeleteRemoteBranch {
        remote: String,
        branch: String,
    },
}

/// In-memory VCS fake.
///
/// Cloning creates the destination directory on disk so controller setup
/// can be asserted against a real path. Each empty commit advances a
/// counter so head SHAs are distinct across sends.
pub struct MockVcs {
    default_branch: String,
    commit_seq: Mutex<u64>,
    calls: Mutex<Vec<VcsCall>>,
    failures: Mutex<HashSet<&'static str>>,
    deleted_branches: Mutex<Vec<String>>,
}

impl MockVcs {
    /// Create a fake whose clones sit on a `main` default branch.
    pub fn new() -> Self {
        Self::with_default_branch("main")
    }

    /// Create a fake reporting `branch` as the checked-out branch.
    pub fn with_default_branch(branch: &str) -> Self {
        Self {
            default_branch: branch.to_string(),
            commit_seq: Mutex::new(0),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashSet::new()),
            deleted_branches: Mutex::new(Vec::new()),
        }
    }

    /// Make the named operation (e.g. `"commit_empty"`) fail until cleared.
    pub fn fail_operation(&self, op: &'static str) {
        self.failures.lock().unwrap().insert(op);
    }

    /// Clear all injected failures.
    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Branches deleted from a remote, in order.
    pub fn deleted_branches(&self) -> Vec<String> {
        self.deleted_branches.lock().unwrap().clone()
    }

    fn record(&self, call: VcsCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: &str) -> Result<()> {
        if self.failures.lock().unwrap().contains(op) {
            return Err(Error::Git {
                command: format!("git {op}"),
                stderr: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VcsClient for MockVcs {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        self.record(VcsCall::Clone {
            url: url.to_string(),
            dest: dest.to_string_lossy().into_owned(),
        });
        self.check("clone_repo")?;
        std::fs::create_dir_all(dest)?;
        Ok(())
    }

    async fn current_branch(&self, _repo_dir: &Path) -> Result<String> {
        self.record(VcsCall::CurrentBranch);
        self.check("current_branch")?;
        Ok(self.default_branch.clone())
    }

    async fn add_remote(&self, _repo_dir: &Path, name: &str, url: &str) -> Result<()> {
        self.record(VcsCall::AddRemote {
            name: name.to_string(),
            url: url.to_string(),
        });
        self.check("add_remote")
    }

    async fn fetch_all(&self, _repo_dir: &Path) -> Result<()> {
        self.record(VcsCall::FetchAll);
        self.check("fetch_all")
    }

    async fn checkout_remote_branch(
        &self,
        _repo_dir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<()> {
        self.record(VcsCall::CheckoutRemoteBranch {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        self.check("checkout_remote_branch")
    }

    async fn create_branch(&self, _repo_dir: &Path, name: &str) -> Result<()> {
        self.record(VcsCall::CreateBranch {
            name: name.to_string(),
        });
        self.check("create_branch")
    }

    async fn commit_empty(&self, _repo_dir: &Path, message: &str) -> Result<()> {
        self.record(VcsCall::CommitEmpty {
            message: message.to_string(),
        });
        self.check("commit_empty")?;
        *self.commit_seq.lock().unwrap() += 1;
        Ok(())
    }

    async fn head_commit(&self, _repo_dir: &Path) -> Result<String> {
        self.record(VcsCall::HeadCommit);
        self.check("head_commit")?;
        let seq = *self.commit_seq.lock().unwrap();
        Ok(format!("sha-{seq:07}"))
    }

    async fn push_branch(&self, _repo_dir: &Path, remote: &str, branch: &str) -> Result<()> {
        self.record(VcsCall::Push {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        self.check("push_branch")
    }

    async fn delete_remote_branch(
        &self,
        _repo_dir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<()> {
        self.record(VcsCall::DeleteRemoteBranch {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        self.check("delete_remote_branch")?;
        self.deleted_branches.lock().unwrap().push(branch.to_string());
        Ok(())
    }
}
