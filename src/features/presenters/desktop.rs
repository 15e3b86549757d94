//! # Desktop Notifications
//!
//! Native notifications through `notify-send`. Permission is decided once at
//! startup: granted when the notifier program runs, denied otherwise or when
//! disabled in the config. Notifying while denied does nothing.

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use std::process::Stdio;
use std::sync::RwLock;
use tokio::process::Command;

use crate::api::Reminder;
use crate::features::presenters::REMINDER_TITLE;

const DEFAULT_PROGRAM: &str = "notify-send";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    /// Not asked yet
    Default,
    Granted,
    Denied,
}

pub struct DesktopNotifier {
    program: String,
    permission: RwLock<NotificationPermission>,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Use a different notifier executable with `notify-send` compatible arguments
    pub fn with_program(program: impl Into<String>) -> Self {
        DesktopNotifier {
            program: program.into(),
            permission: RwLock::new(NotificationPermission::Default),
        }
    }

    /// A notifier that never shows anything
    pub fn denied() -> Self {
        let notifier = Self::new();
        notifier.set_permission(NotificationPermission::Denied);
        notifier
    }

    pub fn permission(&self) -> NotificationPermission {
        self.permission
            .read()
            .map(|p| *p)
            .unwrap_or(NotificationPermission::Denied)
    }

    fn set_permission(&self, permission: NotificationPermission) {
        if let Ok(mut guard) = self.permission.write() {
            *guard = permission;
        }
    }

    /// Decide permission if still undecided, by probing the notifier program
    pub async fn request_permission(&self) -> NotificationPermission {
        let current = self.permission();
        if current != NotificationPermission::Default {
            return current;
        }

        let probe = Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        let decided = match probe {
            Ok(status) if status.success() => {
                info!("Desktop notifications enabled via {}", self.program);
                NotificationPermission::Granted
            }
            Ok(status) => {
                warn!(
                    "{} exited with {} - desktop notifications disabled",
                    self.program, status
                );
                NotificationPermission::Denied
            }
            Err(e) => {
                warn!(
                    "{} not available ({}) - desktop notifications disabled",
                    self.program, e
                );
                NotificationPermission::Denied
            }
        };

        self.set_permission(decided);
        decided
    }

    pub async fn notify(&self, reminder: &Reminder) -> Result<()> {
        if self.permission() != NotificationPermission::Granted {
            debug!(
                "Skipping desktop notification for {} (permission {:?})",
                reminder.medication_name,
                self.permission()
            );
            return Ok(());
        }

        let body = format!("{} - {}", reminder.medication_name, reminder.dosage);
        let tag = format!("string:x-dunst-stack-tag:med-{}", reminder.medication_id);

        let status = Command::new(&self.program)
            .args(["--app-name=medminder", "--urgency=critical", "--hint"])
            .arg(&tag)
            .arg(REMINDER_TITLE)
            .arg(&body)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| anyhow!("Failed to run {}: {}", self.program, e))?;

        if !status.success() {
            return Err(anyhow!("{} exited with {}", self.program, status));
        }
        Ok(())
    }
}
