//! # Reminders Feature
//!
//! Polls the server for upcoming reminders and announces each one once, in the
//! first seconds of its scheduled minute.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod clock;
pub mod dedup;
pub mod matching;
pub mod poller;

pub use clock::{Clock, SystemClock};
pub use dedup::DedupTracker;
pub use matching::FiringWindow;
pub use poller::{CycleReport, ReminderPoller};
