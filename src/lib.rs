// Core layer - configuration and error types
pub mod core;

// API layer - HTTP access to the reminder server
pub mod api;

// Features layer - polling, dose logging, presenters
pub mod features;

// Application layer - terminal commands
pub mod commands;

#[cfg(test)]
mod testing;

pub use crate::core::{ApiError, Config};

pub use api::{ApiClient, DoseLogged, DoseRecorder, MedicationId, Reminder, ReminderFeed};

pub use features::{
    // Doses
    DoseLogger, DoseOutcome,
    // Presenters
    ConsolePresenter, DesktopNotifier, NotificationPermission, Presenter, ToastKind,
    // Reminders
    Clock, DedupTracker, FiringWindow, ReminderPoller, SystemClock,
};

pub use commands::{CommandRunner, Flow, UserCommand};
