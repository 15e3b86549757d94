//! # Features Layer
//!
//! Reminder polling, dose logging and the presenters both report through.

pub mod doses;
pub mod presenters;
pub mod reminders;

pub use doses::{DoseLogger, DoseOutcome};
pub use presenters::{ConsolePresenter, DesktopNotifier, NotificationPermission, Presenter, ToastKind};
pub use reminders::{Clock, DedupTracker, FiringWindow, ReminderPoller, SystemClock};
