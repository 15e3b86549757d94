//! # Feature: Dose Logger
//!
//! Records one dose-taken event per user action. Exactly one request, no retry;
//! the outcome is shown as a toast. Two entry points:
//! - `log_from_notification` for the reminder popup's "Mark as Taken"
//! - `log_quick` for the schedule view, which also reloads the list on success
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use log::{info, warn};
use std::sync::Arc;

use crate::api::protocol::sort_by_time;
use crate::api::{DoseRecorder, MedicationId, ReminderFeed};
use crate::features::presenters::{Presenter, ToastKind};

/// Toast text for any failed dose request
pub const DOSE_ERROR_MESSAGE: &str = "Error logging dose";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoseOutcome {
    /// Server confirmed; carries its message
    Logged(String),
    Failed,
}

impl DoseOutcome {
    pub fn is_logged(&self) -> bool {
        matches!(self, DoseOutcome::Logged(_))
    }
}

pub struct DoseLogger {
    recorder: Arc<dyn DoseRecorder>,
    feed: Arc<dyn ReminderFeed>,
    presenter: Arc<dyn Presenter>,
}

impl DoseLogger {
    pub fn new(
        recorder: Arc<dyn DoseRecorder>,
        feed: Arc<dyn ReminderFeed>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        DoseLogger {
            recorder,
            feed,
            presenter,
        }
    }

    /// Log a dose from a reminder popup; toast only
    pub async fn log_from_notification(&self, medication_id: &MedicationId) -> DoseOutcome {
        self.record(medication_id).await
    }

    /// Log a dose from the schedule view; reloads the schedule when it succeeds
    pub async fn log_quick(&self, medication_id: &MedicationId) -> DoseOutcome {
        let outcome = self.record(medication_id).await;
        if outcome.is_logged() {
            self.show_schedule().await;
        }
        outcome
    }

    /// Fetch the upcoming reminders and present them sorted by time
    pub async fn show_schedule(&self) {
        match self.feed.upcoming_reminders().await {
            Ok(mut reminders) => {
                sort_by_time(&mut reminders);
                self.presenter.show_schedule(&reminders).await;
            }
            Err(e) => warn!("Failed to load reminders: {e}"),
        }
    }

    async fn record(&self, medication_id: &MedicationId) -> DoseOutcome {
        match self.recorder.log_dose(medication_id).await {
            Ok(logged) => {
                info!("Dose logged for medication {medication_id}: {}", logged.message);
                self.presenter
                    .show_toast(&logged.message, ToastKind::Success)
                    .await;
                DoseOutcome::Logged(logged.message)
            }
            Err(e) => {
                warn!("Error logging dose for medication {medication_id}: {e}");
                self.presenter
                    .show_toast(DOSE_ERROR_MESSAGE, ToastKind::Error)
                    .await;
                DoseOutcome::Failed
            }
        }
    }
}
