//! # API Protocol
//!
//! JSON shapes exchanged with the reminder server:
//! - `GET /api/upcoming-reminders` returns `[Reminder]`
//! - `POST /api/dose/{medication_id}` returns `DoseLogged`

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;

/// Medication identifier as sent by the server.
///
/// The server uses integer ids, but string ids are accepted so the agent does
/// not care how the backend stores them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MedicationId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MedicationId::Number(n) => write!(f, "{n}"),
            MedicationId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for MedicationId {
    fn from(id: i64) -> Self {
        MedicationId::Number(id)
    }
}

impl std::str::FromStr for MedicationId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => MedicationId::Number(n),
            Err(_) => MedicationId::Text(s.to_string()),
        })
    }
}

/// A scheduled dose from the upcoming-reminders feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Reminder row id; older servers omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub medication_id: MedicationId,
    pub medication_name: String,
    pub dosage: String,
    /// Local time of day, "HH:MM" 24-hour
    pub time: String,
}

fn hh_mm() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").ok())
        .as_ref()
}

impl Reminder {
    /// Whether `time` can ever equal a clock reading formatted as `%H:%M`
    pub fn has_well_formed_time(&self) -> bool {
        hh_mm().is_some_and(|re| re.is_match(&self.time))
    }
}

/// Decode feed rows one at a time, skipping rows that do not fit [`Reminder`]
pub fn decode_reminders(rows: Vec<Value>) -> Vec<Reminder> {
    let total = rows.len();
    let reminders: Vec<Reminder> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<Reminder>(row) {
            Ok(reminder) => Some(reminder),
            Err(e) => {
                warn!("Skipping reminder row {index}: {e}");
                None
            }
        })
        .collect();

    if reminders.len() < total {
        warn!("Decoded {} of {} reminder rows", reminders.len(), total);
    }
    reminders
}

/// Sort reminders the way the dashboard lists them: by time, then name
pub fn sort_by_time(reminders: &mut [Reminder]) {
    reminders.sort_by(|a, b| {
        a.time
            .cmp(&b.time)
            .then_with(|| a.medication_name.cmp(&b.medication_name))
    });
}

/// Response body of a successful dose POST
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseLogged {
    #[serde(default = "default_true")]
    pub success: bool,
    pub message: String,
}

fn default_true() -> bool {
    true
}
