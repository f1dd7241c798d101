use thiserror::Error;

use crate::CalendarDay;

/// Validation and contract errors exposed by `cyclemark-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date must be a calendar date formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: CalendarDay, end: CalendarDay },

    #[error("invalid cycle kind '{value}', expected one of bull, bear")]
    InvalidCycleKind { value: String },

    #[error("timestamp {millis}ms cannot be mapped to a calendar date")]
    TimestampOutOfRange { millis: i64 },
    #[error("local UTC offset for timestamp {millis}ms cannot be determined")]
    IndeterminateLocalOffset { millis: i64 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("invalid value '{value}' for configuration key '{key}'")]
    InvalidConfig { key: &'static str, value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
