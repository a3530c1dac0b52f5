//! Background task for periodic bill notification checks
//!
//! The UI triggers a check on login; this task covers the steady state by
//! sweeping every user's bills on an interval. Configured via environment
//! variables:
//!
//! - `TALLY_NOTIFY_SCHEDULE`: Interval in hours between sweeps
//!   (default: 12, matching the dedup window; "0" disables the task)

use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;
use tracing::{info, warn};

use tally_core::{BillNotificationScheduler, Database, LogAlertSink, DEDUP_WINDOW_HOURS};

/// Configuration for the periodic notification sweep
#[derive(Debug, Clone)]
pub struct NotifyScheduleConfig {
    /// Interval between sweeps in hours
    pub interval_hours: u64,
}

impl NotifyScheduleConfig {
    /// Parse configuration from environment variables
    ///
    /// Returns None if the sweep is explicitly disabled
    /// (TALLY_NOTIFY_SCHEDULE=0); unset falls back to the dedup window.
    pub fn from_env() -> Option<Self> {
        let interval_hours: u64 = std::env::var("TALLY_NOTIFY_SCHEDULE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEDUP_WINDOW_HOURS as u64);

        if interval_hours == 0 {
            warn!("TALLY_NOTIFY_SCHEDULE is 0, periodic notification checks disabled");
            return None;
        }

        Some(Self { interval_hours })
    }
}

/// Start the notification sweep as a background task
///
/// Spawns a tokio task that runs indefinitely, checking every user's bills
/// at the configured interval. The first sweep runs immediately on startup.
pub fn start_notification_scheduler(db: Database, config: NotifyScheduleConfig) {
    info!(
        "Starting notification scheduler: every {} hours",
        config.interval_hours
    );

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.interval_hours * 3600));

        loop {
            ticker.tick().await;
            run_sweep(&db);
        }
    });
}

/// Run one sweep over every user with bills
fn run_sweep(db: &Database) {
    let users = match db.list_user_ids() {
        Ok(users) => users,
        Err(e) => {
            warn!(error = %e, "Notification sweep could not list users");
            return;
        }
    };

    let now = Utc::now();
    let sink = LogAlertSink;
    let scheduler = BillNotificationScheduler::new(db).with_sink(&sink);

    let mut created = 0;
    for user_id in &users {
        // One user's failure must not starve the rest of the sweep
        match scheduler.run(user_id, now) {
            Ok(outcome) => created += outcome.created.len(),
            Err(e) => {
                warn!(user_id, error = %e, "Notification check failed");
            }
        }
    }

    info!(users = users.len(), created, "Notification sweep complete");
}
