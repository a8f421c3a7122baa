//! Fleet coordination across tracked repositories.
//!
//! The fleet owns one [`RepoController`] per configured slug and broadcasts
//! the two periodic actions to all of them, sequentially. One repository's
//! failure never stops the iteration over the others.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config;
use crate::controller::RepoController;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::RepoSlug;
use crate::vcs::VcsClient;

/// Builds the platform service for one repository.
///
/// The fleet needs a fresh service per slug because a platform client is
/// scoped to a single `owner/name`.
pub trait PlatformFactory: Send + Sync {
    /// Create the platform service for `slug`.
    fn create(&self, slug: &RepoSlug) -> Result<Arc<dyn PlatformService>>;
}

impl<F> PlatformFactory for F
where
    F: Fn(&RepoSlug) -> Result<Arc<dyn PlatformService>> + Send + Sync,
{
    fn create(&self, slug: &RepoSlug) -> Result<Arc<dyn PlatformService>> {
        self(slug)
    }
}

/// Owns the repository controllers and broadcasts the two periodic actions.
pub struct Fleet {
    controllers: Vec<RepoController>,
}

impl Fleet {
    /// Wrap pre-built controllers.
    pub const fn new(controllers: Vec<RepoController>) -> Self {
        Self { controllers }
    }

    /// Parse `slugs` and initialize a controller for each.
    ///
    /// The operator identity is read from `GITHUB_USER` once for the whole
    /// fleet; a missing value is fatal. A malformed slug is a configuration
    /// error and also fatal, while a repository that fails setup (clone,
    /// remote registration) is reported and skipped.
    pub async fn init(
        slugs: &[String],
        vcs: Arc<dyn VcsClient>,
        platforms: &dyn PlatformFactory,
    ) -> Result<Self> {
        let operator = config::github_user()?;
        Self::init_with_operator(slugs, operator, vcs, platforms).await
    }

    /// Like [`Self::init`], with the operator identity supplied by the
    /// caller instead of read from the environment.
    pub async fn init_with_operator(
        slugs: &[String],
        operator: String,
        vcs: Arc<dyn VcsClient>,
        platforms: &dyn PlatformFactory,
    ) -> Result<Self> {
        let mut controllers = Vec::with_capacity(slugs.len());

        for raw in slugs {
            let slug = RepoSlug::parse(raw)?;

            let platform = match platforms.create(&slug) {
                Ok(platform) => platform,
                Err(err) => {
                    warn!(repo = %slug, error = %err, "skipping repository, platform setup failed");
                    continue;
                }
            };

            match RepoController::init_with_operator(
                slug.clone(),
                operator.clone(),
                Arc::clone(&vcs),
                platform,
            )
            .await
            {
                Ok(controller) => controllers.push(controller),
                Err(err) => {
                    if matches!(err, Error::Config(_)) {
                        return Err(err);
                    }
                    warn!(repo = %slug, error = %err, "skipping repository, initialization failed");
                }
            }
        }

        info!(count = controllers.len(), "fleet initialized");
        Ok(Self { controllers })
    }

    /// Number of active controllers.
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Whether the fleet has no controllers at all.
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Controllers, for inspection.
    pub fn controllers(&self) -> &[RepoController] {
        &self.controllers
    }

    /// Mutable access to the controllers.
    pub fn controllers_mut(&mut self) -> &mut [RepoController] {
        &mut self.controllers
    }

    /// Open one empty PR per repository.
    ///
    /// Failures are logged with the repository slug and isolated; every
    /// controller is invoked regardless of what happened before it.
    pub async fn send_empty_prs(&mut self) {
        for controller in &mut self.controllers {
            if let Err(err) = controller.send_empty_pr().await {
                warn!(repo = %controller.slug(), error = %err, "sending empty PR failed");
            }
        }
    }

    /// Clean up branches whose CI run succeeded, across all repositories.
    pub async fn close_succeeded_prs(&mut self) {
        for controller in &mut self.controllers {
            let closed = controller.close_succeeded_prs().await;
            if closed > 0 {
                info!(repo = %controller.slug(), closed, "cleaned up empty-PR branches");
            }
        }
    }
}
