//! Periodic due-reminder scanner.
//!
//! One background task shares the database with request traffic. Each cycle
//! captures a cutoff, pre-filters tasks by `due_date_time <= cutoff`, then
//! notifies each reminder whose own `date` is strictly before the cutoff and
//! that has not been dispatched before. Outcomes are recorded durably so a
//! reminder is not renotified every cycle.

use crate::db::Database;
use crate::notify::{Notifier, Outcome};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Message attached to every due-reminder notification.
const REMINDER_MESSAGE: &str = "Reminder due";

/// The periodic due-reminder scanner.
pub struct Scanner {
    db: Database,
    notifier: Arc<Notifier>,
    interval: Duration,
}

impl Scanner {
    pub fn new(db: Database, notifier: Arc<Notifier>, interval: Duration) -> Self {
        Self {
            db,
            notifier,
            interval,
        }
    }

    /// Run the scan loop forever.
    ///
    /// Cycles are single-flight: the next tick is not processed until the
    /// previous cycle finishes, and ticks missed by a slow cycle are skipped
    /// rather than queued. Errors are logged and never terminate the loop.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(interval_secs = self.interval.as_secs(), "reminder scanner started");

        loop {
            ticker.tick().await;
            let cutoff = Utc::now();

            match self.run_cycle(cutoff).await {
                Ok(0) => debug!("scan cycle complete, nothing due"),
                Ok(n) => info!(notified = n, "scan cycle complete"),
                Err(e) => error!(error = %e, "scan cycle failed, skipping until next tick"),
            }
        }
    }

    /// Run one scan cycle against the given cutoff.
    ///
    /// Returns the number of notifications delivered. A store failure aborts
    /// the cycle; a notification failure for one task is recorded and does
    /// not block attempts for the remaining tasks.
    pub async fn run_cycle(&self, cutoff: DateTime<Utc>) -> Result<usize, crate::error::StoreError> {
        let tasks = self.db.list_due_before(cutoff)?;

        let mut delivered = 0;
        for task in &tasks {
            for reminder in &task.reminders {
                // The reminder's own date is the authoritative trigger,
                // strictly before the cutoff; due_date_time only pre-filtered
                // the query above.
                if reminder.date >= cutoff || reminder.notified_at.is_some() {
                    continue;
                }

                match self.notifier.notify(task, REMINDER_MESSAGE).await {
                    Ok(Outcome::Delivered) => {
                        delivered += 1;
                        self.db.record_notification(
                            &task.id,
                            &reminder.id,
                            "sent",
                            REMINDER_MESSAGE,
                            cutoff,
                        )?;
                    }
                    Ok(Outcome::Skipped) => {
                        // Unknown or unregistered method. Stamp the reminder
                        // anyway so the skip is not relogged every cycle.
                        self.db.record_notification(
                            &task.id,
                            &reminder.id,
                            "skipped",
                            REMINDER_MESSAGE,
                            cutoff,
                        )?;
                    }
                    Err(e) => {
                        warn!(task_id = %task.id, reminder_id = %reminder.id, error = %e,
                            "notification failed");
                        // Leave notified_at unstamped: the next cycle retries.
                        self.db.record_notify_failure(&task.id, &e.to_string())?;
                    }
                }
            }
        }

        Ok(delivered)
    }
}
