use chrono::{DateTime, Duration, Utc};

use crate::engine::Scheduler;
use crate::error::{Result, SchedulerError};
use crate::task::{Job, Task};

/// A task that repeats at a fixed relative interval, with no calendar
/// awareness.
///
/// `period` is computed once from the builder offsets and immutable
/// thereafter. A zero period is allowed and makes the task due on every
/// scheduler tick.
pub struct IntervalTask {
    job: Job,
    period: Duration,
    last_run: DateTime<Utc>,
    next_run: DateTime<Utc>,
}

impl IntervalTask {
    fn new(job: Job, period_secs: u32, now: DateTime<Utc>) -> Self {
        let period = Duration::seconds(i64::from(period_secs));
        Self {
            job,
            period,
            last_run: now,
            next_run: now + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn last_run(&self) -> DateTime<Utc> {
        self.last_run
    }

    pub fn next_run(&self) -> DateTime<Utc> {
        self.next_run
    }
}

impl Task for IntervalTask {
    fn is_due(&mut self, now: DateTime<Utc>) -> bool {
        now >= self.next_run
    }

    fn run(&mut self, now: DateTime<Utc>) {
        (self.job)();
        self.last_run = now;
        self.next_run = now + self.period;
    }
}

/// Fluent builder returned by [`Scheduler::schedule_interval`].
///
/// Offsets accumulate into one period: `hour*3600 + minute*60 + second`
/// seconds. Setters validate their bounds and fail the registration with
/// [`SchedulerError::OutOfRange`] instead of storing a bad offset. The hour
/// bound is deliberately inclusive at 24, one past a full day.
pub struct IntervalTaskBuilder<'a> {
    scheduler: &'a mut Scheduler,
    hour: u32,
    minute: u32,
    second: u32,
}

impl<'a> IntervalTaskBuilder<'a> {
    pub(crate) fn new(scheduler: &'a mut Scheduler) -> Self {
        Self {
            scheduler,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }

    /// Run every `h` hours, `h` ∈ [0, 24].
    pub fn hour(mut self, h: u32) -> Result<Self> {
        if h > 24 {
            return Err(SchedulerError::OutOfRange {
                what: "hour",
                value: h,
                max: 24,
            });
        }
        self.hour = h;
        Ok(self)
    }

    /// Run every `m` minutes, `m` ∈ [0, 60].
    pub fn minute(mut self, m: u32) -> Result<Self> {
        if m > 60 {
            return Err(SchedulerError::OutOfRange {
                what: "minute",
                value: m,
                max: 60,
            });
        }
        self.minute = m;
        Ok(self)
    }

    /// Run every `s` seconds, `s` ∈ [0, 60].
    pub fn second(mut self, s: u32) -> Result<Self> {
        if s > 60 {
            return Err(SchedulerError::OutOfRange {
                what: "second",
                value: s,
                max: 60,
            });
        }
        self.second = s;
        Ok(self)
    }

    /// Finalise: compute the period, stamp `last_run` with the current time,
    /// and register the task with the scheduler.
    pub fn run(self, job: impl Fn() + Send + 'static) -> Result<()> {
        let period_secs = self.hour * 3600 + self.minute * 60 + self.second;
        let label = format!("every {period_secs}s");
        let task = IntervalTask::new(Box::new(job), period_secs, Utc::now());
        self.scheduler.register(label, Box::new(task));
        Ok(())
    }
}
