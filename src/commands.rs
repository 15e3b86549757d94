//! # User Commands
//!
//! Line commands typed at the terminal. They stand in for the popup buttons
//! ("Mark as Taken", "Remind Later") and the schedule view's quick-log action.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{anyhow, Result};
use log::debug;
use std::io::Write;
use std::sync::Arc;

use crate::api::MedicationId;
use crate::features::doses::DoseLogger;
use crate::features::presenters::{ConsolePresenter, Presenter, ToastKind};
use crate::features::reminders::ReminderPoller;

pub const HELP: &str = "\
Commands:
  taken [id]  mark the open reminder (or medication <id>) as taken
  log <id>    log a dose for medication <id> and refresh the list
  later       dismiss the open reminder
  list        show upcoming reminders
  check       check for due reminders now
  help        show this help
  quit        exit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Taken(Option<MedicationId>),
    Log(MedicationId),
    Later,
    List,
    Check,
    Help,
    Quit,
}

impl std::str::FromStr for UserCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let verb = parts
            .next()
            .ok_or_else(|| anyhow!("Empty command"))?
            .to_lowercase();
        let arg = parts.next().map(|a| a.parse::<MedicationId>());

        if parts.next().is_some() {
            return Err(anyhow!("Too many arguments: {}", s.trim()));
        }

        // parse::<MedicationId>() is infallible
        let arg = arg.map(|a| a.unwrap_or_else(|never| match never {}));

        match (verb.as_str(), arg) {
            ("taken" | "take" | "t", id) => Ok(UserCommand::Taken(id)),
            ("log" | "l", Some(id)) => Ok(UserCommand::Log(id)),
            ("log" | "l", None) => Err(anyhow!("Usage: log <medication id>")),
            ("later" | "dismiss", None) => Ok(UserCommand::Later),
            ("list" | "ls", None) => Ok(UserCommand::List),
            ("check", None) => Ok(UserCommand::Check),
            ("help" | "?", None) => Ok(UserCommand::Help),
            ("quit" | "exit" | "q", None) => Ok(UserCommand::Quit),
            _ => Err(anyhow!("Unknown command: {}", s.trim())),
        }
    }
}

/// Whether the command loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Executes parsed commands against the running agent
pub struct CommandRunner<W: Write + Send + 'static> {
    console: Arc<ConsolePresenter<W>>,
    doses: Arc<DoseLogger>,
    poller: Arc<ReminderPoller>,
}

impl<W: Write + Send + 'static> CommandRunner<W> {
    pub fn new(
        console: Arc<ConsolePresenter<W>>,
        doses: Arc<DoseLogger>,
        poller: Arc<ReminderPoller>,
    ) -> Self {
        CommandRunner {
            console,
            doses,
            poller,
        }
    }

    /// Parse and execute one input line; unknown input prints help
    pub async fn handle_line(&self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }
        match line.parse::<UserCommand>() {
            Ok(command) => self.execute(command).await,
            Err(e) => {
                self.console.show_toast(&e.to_string(), ToastKind::Error).await;
                self.console.show_toast(HELP.trim_end(), ToastKind::Info).await;
                Flow::Continue
            }
        }
    }

    pub async fn execute(&self, command: UserCommand) -> Flow {
        debug!("Executing {command:?}");
        match command {
            UserCommand::Taken(Some(id)) => {
                self.console.dismiss_popup();
                self.doses.log_from_notification(&id).await;
            }
            UserCommand::Taken(None) => match self.console.take_active_popup() {
                Some(reminder) => {
                    self.doses
                        .log_from_notification(&reminder.medication_id)
                        .await;
                }
                None => {
                    self.console
                        .show_toast(
                            "No open reminder - use `taken <id>`",
                            ToastKind::Info,
                        )
                        .await;
                }
            },
            UserCommand::Log(id) => {
                self.doses.log_quick(&id).await;
            }
            UserCommand::Later => {
                if !self.console.dismiss_popup() {
                    self.console
                        .show_toast("No open reminder", ToastKind::Info)
                        .await;
                }
            }
            UserCommand::List => self.doses.show_schedule().await,
            UserCommand::Check => {
                let report = self.poller.check_once().await;
                if report.fetch_failed {
                    self.console
                        .show_toast("Could not reach the reminder server", ToastKind::Error)
                        .await;
                } else if report.fired.is_empty() {
                    self.console
                        .show_toast("Nothing due right now", ToastKind::Info)
                        .await;
                }
            }
            UserCommand::Help => {
                self.console.show_toast(HELP.trim_end(), ToastKind::Info).await;
            }
            UserCommand::Quit => return Flow::Exit,
        }
        Flow::Continue
    }
}
