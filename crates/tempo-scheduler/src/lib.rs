//! `tempo-scheduler` — in-process periodic task runner.
//!
//! # Overview
//!
//! Callers register work as either a six-field cron expression
//! (see `tempo-cron`) or a fixed relative interval, then start the
//! scheduler. A polling loop scans the tasks on a fixed tick and pushes due
//! ones through a bounded queue to a fixed pool of workers.
//!
//! ```no_run
//! use tempo_scheduler::{Scheduler, SchedulerConfig};
//!
//! # async fn demo() -> tempo_scheduler::Result<()> {
//! let mut scheduler = Scheduler::new(SchedulerConfig::default());
//! scheduler.schedule_cron("0 9 * * mon-fri *", || println!("stand-up"))?;
//! scheduler.schedule_interval().minute(5)?.run(|| println!("heartbeat"))?;
//!
//! let handle = scheduler.start();
//! // ... later
//! handle.stop().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Guarantees
//!
//! - Tasks are scanned for due-ness in registration order on every tick; no
//!   execution-order guarantee exists among workers.
//! - At most one execution of a given task is in flight at a time, even when
//!   a run outlasts the tick interval.
//! - A full dispatch queue blocks the polling loop (backpressure); workers
//!   block on an empty queue.
//! - Stopping drains already-queued work and joins every worker.

pub mod config;
pub mod cron;
pub mod engine;
pub mod error;
pub mod interval;
pub mod task;

pub use config::SchedulerConfig;
pub use cron::CronTask;
pub use engine::{Scheduler, SchedulerHandle};
pub use error::{Result, SchedulerError};
pub use interval::{IntervalTask, IntervalTaskBuilder};
pub use task::{Job, Task};
