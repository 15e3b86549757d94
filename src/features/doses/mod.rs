//! # Doses Feature
//!
//! "Mark as taken" for a medication, reported back through a toast.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod logger;

pub use logger::{DoseLogger, DoseOutcome, DOSE_ERROR_MESSAGE};
