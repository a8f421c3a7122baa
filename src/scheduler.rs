//! Interval-driven entry points for the fleet.
//!
//! Both jobs run on a single task; `select!` serializes them, so a long
//! send pass delays the next cleanup pass instead of racing it over a
//! controller's working directory.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::info;

use crate::config::Config;
use crate::fleet::Fleet;

const SECS_PER_HOUR: u64 = 60 * 60;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Run the send and cleanup jobs forever on their configured intervals.
///
/// Registered jobs are logged at startup. The first tick of each job fires
/// one full interval after startup, matching a freshly scheduled job rather
/// than an immediate run.
pub async fn run(mut fleet: Fleet, config: &Config) {
    let send_period = Duration::from_secs(config.send_interval_days * SECS_PER_DAY);
    let close_period = Duration::from_secs(config.close_interval_hours * SECS_PER_HOUR);

    info!(
        interval_days = config.send_interval_days,
        "registered job: send empty PRs"
    );
    info!(
        interval_hours = config.close_interval_hours,
        "registered job: close succeeded empty PRs"
    );

    let start = time::Instant::now();
    let mut send_timer = time::interval_at(start + send_period, send_period);
    let mut close_timer = time::interval_at(start + close_period, close_period);
    send_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    close_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = send_timer.tick() => fleet.send_empty_prs().await,
            _ = close_timer.tick() => fleet.close_succeeded_prs().await,
        }
    }
}
