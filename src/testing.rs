//! Fakes for the collaborator traits, shared by the unit tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveTime;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::api::{decode_reminders, DoseLogged, DoseRecorder, MedicationId, Reminder, ReminderFeed};
use crate::core::ApiError;
use crate::features::presenters::{Presenter, ToastKind};
use crate::features::reminders::Clock;

pub fn reminder(id: i64, name: &str, dosage: &str, time: &str) -> Reminder {
    Reminder {
        id: None,
        medication_id: MedicationId::Number(id),
        medication_name: name.to_string(),
        dosage: dosage.to_string(),
        time: time.to_string(),
    }
}

pub struct FixedClock(Mutex<NaiveTime>);

impl FixedClock {
    pub fn at(h: u32, m: u32, s: u32) -> Self {
        FixedClock(Mutex::new(NaiveTime::from_hms_opt(h, m, s).unwrap()))
    }

    pub fn set(&self, h: u32, m: u32, s: u32) {
        *self.0.lock().unwrap() = NaiveTime::from_hms_opt(h, m, s).unwrap();
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        *self.0.lock().unwrap()
    }
}

/// Feed returning a fixed list, optionally failing the first call
pub struct ScriptedFeed {
    reminders: Vec<Reminder>,
    fail_next: AtomicBool,
    calls: AtomicUsize,
}

impl ScriptedFeed {
    pub fn always(reminders: Vec<Reminder>) -> Self {
        ScriptedFeed {
            reminders,
            fail_next: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Feed serving raw JSON rows, decoded the way the HTTP client decodes them
    pub fn from_rows(rows: serde_json::Value) -> Self {
        let rows: Vec<serde_json::Value> = serde_json::from_value(rows).unwrap();
        Self::always(decode_reminders(rows))
    }

    pub fn failing_then(reminders: Vec<Reminder>) -> Self {
        let feed = Self::always(reminders);
        feed.fail_next.store(true, Ordering::SeqCst);
        feed
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReminderFeed for ScriptedFeed {
    async fn upcoming_reminders(&self) -> Result<Vec<Reminder>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Status(StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(self.reminders.clone())
    }
}

/// Dose endpoint that answers with a message or a status code
pub struct ScriptedRecorder {
    response: Result<String, StatusCode>,
    calls: Mutex<Vec<MedicationId>>,
}

impl ScriptedRecorder {
    pub fn ok(message: &str) -> Self {
        ScriptedRecorder {
            response: Ok(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn status(status: StatusCode) -> Self {
        ScriptedRecorder {
            response: Err(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<MedicationId> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DoseRecorder for ScriptedRecorder {
    async fn log_dose(&self, medication_id: &MedicationId) -> Result<DoseLogged, ApiError> {
        self.calls.lock().unwrap().push(medication_id.clone());
        match self.response {
            Ok(ref message) => Ok(DoseLogged {
                success: true,
                message: message.clone(),
            }),
            Err(status) => Err(ApiError::Status(status)),
        }
    }
}

/// Presenter that records every call
#[derive(Default)]
pub struct RecordingPresenter {
    popups: Mutex<Vec<MedicationId>>,
    notifications: Mutex<Vec<MedicationId>>,
    toasts: Mutex<Vec<(String, ToastKind)>>,
    schedules: Mutex<Vec<Vec<Reminder>>>,
    failing_popup: Option<MedicationId>,
}

impl RecordingPresenter {
    /// Popups for `id` fail instead of being recorded
    pub fn failing_for(id: MedicationId) -> Self {
        RecordingPresenter {
            failing_popup: Some(id),
            ..Default::default()
        }
    }

    pub fn popups(&self) -> Vec<MedicationId> {
        self.popups.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<MedicationId> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn toasts(&self) -> Vec<(String, ToastKind)> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn schedules(&self) -> Vec<Vec<Reminder>> {
        self.schedules.lock().unwrap().clone()
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    async fn show_popup(&self, reminder: &Reminder) -> Result<()> {
        if self.failing_popup.as_ref() == Some(&reminder.medication_id) {
            return Err(anyhow!("popup failed"));
        }
        self.popups.lock().unwrap().push(reminder.medication_id.clone());
        Ok(())
    }

    async fn show_native_notification(&self, reminder: &Reminder) -> Result<()> {
        self.notifications
            .lock()
            .unwrap()
            .push(reminder.medication_id.clone());
        Ok(())
    }

    async fn show_toast(&self, message: &str, kind: ToastKind) {
        self.toasts.lock().unwrap().push((message.to_string(), kind));
    }

    async fn show_schedule(&self, reminders: &[Reminder]) {
        self.schedules.lock().unwrap().push(reminders.to_vec());
    }
}
