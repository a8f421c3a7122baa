//! `git` command-line implementation of [`VcsClient`].

use crate::error::{Error, Result};
use crate::vcs::VcsClient;
use async_trait::async_trait;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Runs `git` as a subprocess in a given working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    /// Create a new command-line client.
    pub const fn new() -> Self {
        Self
    }
}

/// Run a git command, mapping a non-zero exit to [`Error::Git`].
async fn run_git(workdir: &Path, args: &[&str]) -> Result<Output> {
    debug!(workdir = %workdir.display(), ?args, "running git");
    let output = Command::new("git")
        .args(args)
        .current_dir(workdir)
        .output()
        .await?;

    if output.status.success() {
        Ok(output)
    } else {
        Err(Error::Git {
            command: format!("git {}", args.join(" ")),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Run a git command and return its trimmed stdout.
async fn run_git_stdout(workdir: &Path, args: &[&str]) -> Result<String> {
    let output = run_git(workdir, args).await?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[async_trait]
impl VcsClient for GitCli {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let cwd = dest.parent().unwrap_or_else(|| Path::new("."));
        let dest_str = dest.to_string_lossy();
        run_git(cwd, &["clone", url, &dest_str]).await?;
        Ok(())
    }

    async fn current_branch(&self, repo_dir: &Path) -> Result<String> {
        run_git_stdout(repo_dir, &["branch", "--show-current"]).await
    }

    async fn add_remote(&self, repo_dir: &Path, name: &str, url: &str) -> Result<()> {
        run_git(repo_dir, &["remote", "add", name, url]).await?;
        Ok(())
    }

    async fn fetch_all(&self, repo_dir: &Path) -> Result<()> {
        run_git(repo_dir, &["fetch", "--all"]).await?;
        Ok(())
    }

    async fn checkout_remote_branch(
        &self,
        repo_dir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<()> {
        let target = format!("{remote}/{branch}");
        run_git(repo_dir, &["checkout", &target]).await?;
        Ok(())
    }

    async fn create_branch(&self, repo_dir: &Path, name: &str) -> Result<()> {
        run_git(repo_dir, &["checkout", "-b", name]).await?;
        Ok(())
    }

    async fn commit_empty(&self, repo_dir: &Path, message: &str) -> Result<()> {
        run_git(repo_dir, &["commit", "--allow-empty", "-m", message]).await?;
        Ok(())
    }

    async fn head_commit(&self, repo_dir: &Path) -> Result<String> {
        run_git_stdout(repo_dir, &["log", "-1", "--format=%H"]).await
    }

    async fn push_branch(&self, repo_dir: &Path, remote: &str, branch: &str) -> Result<()> {
        run_git(repo_dir, &["push", remote, branch]).await?;
        Ok(())
    }

    async fn delete_remote_branch(
        &self,
        repo_dir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<()> {
        run_git(repo_dir, &["push", remote, "--delete", branch]).await?;
        Ok(())
    }
}
