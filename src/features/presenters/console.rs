//! # Console Presenter
//!
//! Terminal rendering of reminders and toasts. The most recent popup stays
//! "active" for [`POPUP_TIMEOUT`] so `taken`/`later` typed at the prompt can act
//! on it, the way the popup buttons did.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::warn;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::api::Reminder;
use crate::features::presenters::{DesktopNotifier, Presenter, ToastKind, REMINDER_TITLE};

/// How long a popup accepts actions before it dismisses itself
pub const POPUP_TIMEOUT: Duration = Duration::from_secs(10);

const RULE: &str = "────────────────────────────────────────";

struct ActivePopup {
    reminder: Reminder,
    shown_at: Instant,
}

pub struct ConsolePresenter<W: Write + Send> {
    out: Mutex<W>,
    sound: bool,
    desktop: Option<DesktopNotifier>,
    active_popup: Mutex<Option<ActivePopup>>,
}

impl<W: Write + Send> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        ConsolePresenter {
            out: Mutex::new(out),
            sound: true,
            desktop: None,
            active_popup: Mutex::new(None),
        }
    }

    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound = enabled;
        self
    }

    pub fn with_desktop(mut self, notifier: DesktopNotifier) -> Self {
        self.desktop = Some(notifier);
        self
    }

    /// Reminder of the popup still on screen, if it has not timed out
    pub fn active_popup(&self) -> Option<Reminder> {
        let guard = self.active_popup.lock().ok()?;
        let reminder = guard
            .as_ref()
            .filter(|p| p.shown_at.elapsed() < POPUP_TIMEOUT)
            .map(|p| p.reminder.clone());
        reminder
    }

    /// Close the popup; returns whether one was still open
    pub fn dismiss_popup(&self) -> bool {
        let open = self.active_popup().is_some();
        if let Ok(mut guard) = self.active_popup.lock() {
            *guard = None;
        }
        open
    }

    /// Close the popup and hand back its reminder
    pub fn take_active_popup(&self) -> Option<Reminder> {
        let reminder = self.active_popup();
        if let Ok(mut guard) = self.active_popup.lock() {
            *guard = None;
        }
        reminder
    }

    /// Consume the presenter and return the writer
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    // Synchronous write under the lock; blocks are a few lines of terminal text
    fn write_block(&self, text: &str) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow!("console writer lock poisoned"))?;
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn play_sound(&self) -> Result<()> {
        if self.sound {
            self.write_block("\x07")?;
        }
        Ok(())
    }
}

fn render_popup(reminder: &Reminder) -> String {
    format!(
        "\n┌{RULE}\n│ {REMINDER_TITLE}\n│ {}\n│ {}\n│ Scheduled at {}\n│ [taken] ✓ Mark as Taken    [later] Remind Later\n└{RULE}\n",
        reminder.medication_name, reminder.dosage, reminder.time
    )
}

fn render_schedule(reminders: &[Reminder]) -> String {
    if reminders.is_empty() {
        return "No upcoming reminders.\n".to_string();
    }

    let mut text = String::from("Upcoming reminders:\n");
    for reminder in reminders {
        text.push_str(&format!(
            "  {}  {} ({}) [id {}]\n",
            reminder.time, reminder.medication_name, reminder.dosage, reminder.medication_id
        ));
    }
    text
}

#[async_trait]
impl<W: Write + Send> Presenter for ConsolePresenter<W> {
    async fn show_popup(&self, reminder: &Reminder) -> Result<()> {
        self.write_block(&render_popup(reminder))?;
        if let Ok(mut guard) = self.active_popup.lock() {
            *guard = Some(ActivePopup {
                reminder: reminder.clone(),
                shown_at: Instant::now(),
            });
        }
        self.play_sound()
    }

    async fn show_native_notification(&self, reminder: &Reminder) -> Result<()> {
        match self.desktop {
            Some(ref notifier) => notifier.notify(reminder).await,
            None => Ok(()),
        }
    }

    async fn show_toast(&self, message: &str, kind: ToastKind) {
        let icon = match kind {
            ToastKind::Success => "✅",
            ToastKind::Error => "❌",
            ToastKind::Info => "ℹ️",
        };
        if let Err(e) = self.write_block(&format!("{icon} {message}\n")) {
            warn!("Failed to show toast '{message}': {e}");
        }
    }

    async fn show_schedule(&self, reminders: &[Reminder]) {
        if let Err(e) = self.write_block(&render_schedule(reminders)) {
            warn!("Failed to show schedule: {e}");
        }
    }
}
