use tempo_cron::ScheduleError;
use thiserror::Error;

/// Errors that can occur while configuring or registering tasks.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Configuration file / environment parsing failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The cron expression failed to compile.
    #[error("Invalid schedule: {0}")]
    Schedule(#[from] ScheduleError),

    /// An interval builder offset lies outside its documented bounds.
    #[error("{what} interval {value} outside of bounds [0, {max}]")]
    OutOfRange {
        what: &'static str,
        value: u32,
        max: u32,
    },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
