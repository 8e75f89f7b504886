use chrono::{DateTime, Utc};
use tracing::warn;

use tempo_cron::{compile, next, Schedule};

use crate::error::Result;
use crate::task::{Job, Task};

/// A task driven by a compiled cron [`Schedule`].
///
/// `next_run` is lazily initialised on the first due-check and advanced only
/// after the job executes, both computed from the calculator.
pub struct CronTask {
    schedule: Schedule,
    job: Job,
    next_run: Option<DateTime<Utc>>,
    exhausted: bool,
}

impl CronTask {
    /// Compile `expr` and wrap `job`. Fails fast on a malformed expression
    /// so a misconfigured task is rejected at registration, not discovered
    /// as a task that never runs.
    pub fn new(expr: &str, job: impl Fn() + Send + 'static) -> Result<Self> {
        Ok(Self {
            schedule: compile(expr)?,
            job: Box::new(job),
            next_run: None,
            exhausted: false,
        })
    }

    pub fn next_run(&self) -> Option<DateTime<Utc>> {
        self.next_run
    }

    /// Advance `next_run` past `now`, retiring the task when the schedule
    /// has no further occurrence within the search horizon.
    fn reschedule(&mut self, now: DateTime<Utc>) {
        match next(&self.schedule, now) {
            Ok(at) => self.next_run = Some(at),
            Err(e) => {
                warn!("cron schedule exhausted, task will not run again: {e}");
                self.next_run = None;
                self.exhausted = true;
            }
        }
    }
}

impl Task for CronTask {
    fn is_due(&mut self, now: DateTime<Utc>) -> bool {
        if self.exhausted {
            return false;
        }
        match self.next_run {
            None => {
                self.reschedule(now);
                false
            }
            Some(at) => now >= at,
        }
    }

    fn run(&mut self, now: DateTime<Utc>) {
        (self.job)();
        self.reschedule(now);
    }
}
