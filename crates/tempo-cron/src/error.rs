use thiserror::Error;

/// Errors produced when compiling a cron expression or searching for its
/// next occurrence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The expression did not split into exactly six whitespace-separated fields.
    #[error("expected 6 fields (minute hour day-of-month month day-of-week year), got {0}")]
    FieldCount(usize),

    /// A field failed to parse (bad token, extra hyphen/slash, zero step, ...).
    #[error("malformed {field} field: {reason}")]
    Malformed { field: &'static str, reason: String },

    /// A resolved value lies outside the field's permitted bounds.
    #[error("{name} value {value} out of range [{min}, {max}]")]
    OutOfBounds {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// A range's start exceeds its end (e.g. `30-10`).
    #[error("range start {start} is after range end {end}")]
    InvertedRange { start: u32, end: u32 },

    /// No matching time exists within the forward search horizon.
    #[error("no matching time within {years} years")]
    Unsatisfiable { years: i32 },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
