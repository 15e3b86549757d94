//! # Feature: Reminder Poller
//!
//! Fetches the upcoming reminders on a fixed period (plus once at startup),
//! checks each one against the clock and the dedup tracker, and announces the
//! ones that are due.
//!
//! Cycles never overlap: the loop awaits each cycle before taking the next tick
//! and skips ticks missed while a slow fetch was in flight.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Single-flight cycles, per-cycle report
//! - 1.0.0: Initial release

use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use crate::api::{Reminder, ReminderFeed};
use crate::features::presenters::Presenter;
use crate::features::reminders::clock::Clock;
use crate::features::reminders::dedup::DedupTracker;
use crate::features::reminders::matching::{evaluate, Due, FiringWindow};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// What one poll cycle did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fetch_failed: bool,
    pub fetched: usize,
    /// Dedup keys of the reminders announced this cycle
    pub fired: Vec<String>,
    pub already_fired: usize,
    pub outside_window: usize,
    pub present_errors: usize,
}

pub struct ReminderPoller {
    feed: Arc<dyn ReminderFeed>,
    clock: Arc<dyn Clock>,
    dedup: DedupTracker,
    presenter: Arc<dyn Presenter>,
    window: FiringWindow,
    period: Duration,
}

impl ReminderPoller {
    pub fn new(
        feed: Arc<dyn ReminderFeed>,
        clock: Arc<dyn Clock>,
        dedup: DedupTracker,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        ReminderPoller {
            feed,
            clock,
            dedup,
            presenter,
            window: FiringWindow::default(),
            period: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_window(mut self, window: FiringWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn dedup(&self) -> &DedupTracker {
        &self.dedup
    }

    /// Poll forever: one cycle immediately, then one per period
    pub async fn run(&self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Reminder poller started (period: {}s, firing window: 0-{}s, dedup TTL: {}s)",
            self.period.as_secs(),
            self.window.end,
            self.dedup.ttl().as_secs()
        );

        loop {
            ticker.tick().await;
            let report = self.check_once().await;
            debug!("Poll cycle: {report:?}");
        }
    }

    /// Run a single fetch-and-check cycle
    pub async fn check_once(&self) -> CycleReport {
        let mut report = CycleReport::default();

        let reminders = match self.feed.upcoming_reminders().await {
            Ok(reminders) => reminders,
            Err(e) => {
                warn!("Error checking reminders: {e}");
                report.fetch_failed = true;
                return report;
            }
        };
        report.fetched = reminders.len();

        // Read the clock after the fetch so a slow response is judged at arrival time
        let now = self.clock.now();

        for reminder in &reminders {
            if !reminder.has_well_formed_time() {
                warn!(
                    "Reminder for {} has unusable time '{}' - it will never fire",
                    reminder.medication_name, reminder.time
                );
                continue;
            }

            match evaluate(reminder, now, self.window) {
                Due::NotThisMinute => {}
                Due::OutsideWindow => report.outside_window += 1,
                Due::Now { key } => {
                    if !self.dedup.try_mark(&key) {
                        report.already_fired += 1;
                        continue;
                    }
                    info!(
                        "Reminder due: {} {} at {}",
                        reminder.medication_name, reminder.dosage, reminder.time
                    );
                    report.present_errors += self.announce(reminder).await;
                    report.fired.push(key);
                }
            }
        }

        report
    }

    /// Invoke every due-reminder presenter; returns how many failed
    async fn announce(&self, reminder: &Reminder) -> usize {
        let mut failures = 0;

        if let Err(e) = self.presenter.show_popup(reminder).await {
            error!("Failed to show popup for {}: {e}", reminder.medication_name);
            failures += 1;
        }
        if let Err(e) = self.presenter.show_native_notification(reminder).await {
            error!(
                "Failed to send desktop notification for {}: {e}",
                reminder.medication_name
            );
            failures += 1;
        }

        failures
    }
}
