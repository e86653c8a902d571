//! Crate error type.
//!
//! Search itself never fails: infeasibility and soft violations are
//! reported through [`ScheduleOutcome`](crate::scheduler::ScheduleOutcome).
//! Errors here cover malformed configuration and ingestion values.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("weekly hours must be non-negative, got {0}")]
    NegativeHours(i64),

    #[error("weekly hours {0} exceed the supported maximum of {max}", max = u32::MAX)]
    HoursOutOfRange(i64),

    #[error("invalid time slot: {0}")]
    InvalidTimeSlot(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TimetableError>;
