//! Wall-clock source for the poller.

use chrono::{Local, NaiveTime};

/// Supplies the current local time of day
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

/// Reads the local system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}
