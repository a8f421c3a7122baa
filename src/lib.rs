//! ci-nudge: periodic empty-PR CI triggering.
//!
//! Opens an empty-commit pull request against each tracked repository on a
//! schedule, then deletes the PR branch from the operator's fork once the CI
//! run for that commit comes back green.
//!
//! The crate is split into a per-repository [`controller::RepoController`],
//! a [`fleet::Fleet`] that fans the two periodic actions out across all
//! controllers, and narrow [`vcs::VcsClient`] / [`platform::PlatformService`]
//! traits that keep the external git and GitHub surfaces mockable.

pub mod config;
pub mod controller;
pub mod error;
pub mod fleet;
pub mod platform;
pub mod scheduler;
pub mod types;
pub mod vcs;
