//! Scheduler binary entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ci_nudge::config::{self, load_config};
use ci_nudge::error::{Error, Result};
use ci_nudge::fleet::Fleet;
use ci_nudge::platform::{GitHubService, PlatformService};
use ci_nudge::scheduler;
use ci_nudge::types::RepoSlug;
use ci_nudge::vcs::{GitCli, VcsClient};

/// Periodically opens empty pull requests to trigger CI and prunes their
/// branches after green runs.
#[derive(Debug, Parser)]
#[command(name = "nudge", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "nudge.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ci_nudge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "fatal");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(&cli.config)?;
    let token = config::github_token()?;

    let vcs: Arc<dyn VcsClient> = Arc::new(GitCli::new());
    let platforms = move |slug: &RepoSlug| -> Result<Arc<dyn PlatformService>> {
        let service = GitHubService::new(&token, slug.owner.clone(), slug.name.clone())?;
        Ok(Arc::new(service))
    };

    let fleet = Fleet::init(&config.repo_slugs, vcs, &platforms).await?;
    if fleet.is_empty() {
        return Err(Error::Config(
            "no repositories could be initialized".to_string(),
        ));
    }

    scheduler::run(fleet, &config).await;
    Ok(())
}
