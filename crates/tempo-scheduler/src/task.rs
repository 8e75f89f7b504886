use chrono::{DateTime, Utc};

/// A zero-argument unit of work supplied by the caller. No return value:
/// periodic jobs have nobody waiting on a result, and anything the job
/// produces is its own responsibility to deliver.
pub type Job = Box<dyn Fn() + Send + 'static>;

/// The contract every schedulable task satisfies.
///
/// `now` is passed in by the runtime (always `Utc::now()` in production) so
/// due-ness logic stays testable with synthetic clocks.
pub trait Task: Send {
    /// Is the task ready for execution at `now`?
    fn is_due(&mut self, now: DateTime<Utc>) -> bool;

    /// Execute the job, then recompute the next-due time from `now`.
    fn run(&mut self, now: DateTime<Utc>);
}
