//! # Server API
//!
//! HTTP access to the medication-reminder server. The poller and the dose
//! logger only see the [`ReminderFeed`] and [`DoseRecorder`] traits, so tests
//! and alternative backends can stand in for [`ApiClient`].

pub mod client;
pub mod protocol;

use async_trait::async_trait;

use crate::core::ApiError;

pub use client::ApiClient;
pub use protocol::{decode_reminders, DoseLogged, MedicationId, Reminder};

/// Source of the upcoming-reminder set
#[async_trait]
pub trait ReminderFeed: Send + Sync {
    async fn upcoming_reminders(&self) -> Result<Vec<Reminder>, ApiError>;
}

/// Records a dose taken "now"; the server assigns the timestamp
#[async_trait]
pub trait DoseRecorder: Send + Sync {
    async fn log_dose(&self, medication_id: &MedicationId) -> Result<DoseLogged, ApiError>;
}
