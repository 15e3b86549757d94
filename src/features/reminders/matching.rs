//! # Matching Policy
//!
//! Decides whether a reminder is due at a given clock reading. A reminder is
//! due when its "HH:MM" equals the current minute and the current second lies
//! in the firing window `[0, window_end]`.
//!
//! The default 10 s poll period and 10 s window leave no slack: a tick that
//! lands after second 10 misses the minute. Lower the poll interval to close
//! that gap.

use chrono::{NaiveTime, Timelike};

use crate::api::Reminder;

/// Format a clock reading the way the server formats reminder times
pub fn minute_of(now: NaiveTime) -> String {
    now.format("%H:%M").to_string()
}

/// Dedup key for one reminder in one minute, e.g. `7_08:30`
pub fn dedup_key(reminder: &Reminder, current_minute: &str) -> String {
    format!("{}_{}", reminder.medication_id, current_minute)
}

/// Second-of-minute range in which a matching reminder may fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiringWindow {
    /// Inclusive upper bound
    pub end: u32,
}

impl Default for FiringWindow {
    fn default() -> Self {
        FiringWindow { end: 10 }
    }
}

impl FiringWindow {
    pub fn new(end: u32) -> Self {
        FiringWindow { end }
    }

    pub fn contains(&self, second: u32) -> bool {
        second <= self.end
    }
}

/// Outcome of checking one reminder against the clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Due {
    /// Scheduled for another minute
    NotThisMinute,
    /// Right minute, but past the firing window
    OutsideWindow,
    /// Eligible to fire, subject to the dedup mark under `key`
    Now { key: String },
}

pub fn evaluate(reminder: &Reminder, now: NaiveTime, window: FiringWindow) -> Due {
    let current_minute = minute_of(now);
    if reminder.time != current_minute {
        return Due::NotThisMinute;
    }
    if !window.contains(now.second()) {
        return Due::OutsideWindow;
    }
    Due::Now {
        key: dedup_key(reminder, &current_minute),
    }
}
