//! # Presenters Feature
//!
//! User-facing feedback channels: reminder popups, desktop notifications,
//! the sound cue, toasts and the schedule listing.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true

pub mod console;
pub mod desktop;

use anyhow::Result;
use async_trait::async_trait;

use crate::api::Reminder;

pub use console::ConsolePresenter;
pub use desktop::{DesktopNotifier, NotificationPermission};

/// Title shared by the popup and the desktop notification
pub const REMINDER_TITLE: &str = "💊 Time to Take Your Medication";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// Renders feedback to the user.
///
/// The reminder methods return errors so the poller can log one failed
/// reminder and keep going; toasts and listings are best effort.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Show the due-reminder popup, with its sound cue
    async fn show_popup(&self, reminder: &Reminder) -> Result<()>;

    /// Fire a native desktop notification; a no-op when permission was denied
    async fn show_native_notification(&self, reminder: &Reminder) -> Result<()>;

    /// Transient one-line message
    async fn show_toast(&self, message: &str, kind: ToastKind);

    /// Upcoming reminders, already sorted by time
    async fn show_schedule(&self, reminders: &[Reminder]);
}
