use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::SchedulerConfig;
use crate::cron::CronTask;
use crate::error::Result;
use crate::interval::IntervalTaskBuilder;
use crate::task::Task;

/// One registered task plus its dispatch state.
struct Slot {
    id: usize,
    label: String,
    task: Mutex<Box<dyn Task>>,
    /// Set when the slot is pushed onto the dispatch queue, cleared by the
    /// worker after `run` returns. The poll loop skips flagged slots, so a
    /// task whose execution outlasts the tick interval is never enqueued
    /// concurrently with itself.
    in_flight: AtomicBool,
}

/// Owns the task collection and dispatches due work to a fixed worker pool.
///
/// Registration happens before [`start`](Scheduler::start): the registration
/// calls take `&mut self` and `start` consumes the scheduler, so the task
/// collection is append-only while building and read-only once the polling
/// loop runs. Tasks are never removed.
pub struct Scheduler {
    config: SchedulerConfig,
    tasks: Vec<Arc<Slot>>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            tasks: Vec::new(),
        }
    }

    /// Register a cron-driven task. Fails fast when `expr` does not compile;
    /// nothing is stored in that case.
    pub fn schedule_cron(&mut self, expr: &str, job: impl Fn() + Send + 'static) -> Result<()> {
        let task = CronTask::new(expr, job)?;
        self.register(format!("cron {expr}"), Box::new(task));
        Ok(())
    }

    /// Begin registering an interval-driven task; finalise with
    /// [`IntervalTaskBuilder::run`].
    pub fn schedule_interval(&mut self) -> IntervalTaskBuilder<'_> {
        IntervalTaskBuilder::new(self)
    }

    /// Number of registered tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub(crate) fn register(&mut self, label: String, task: Box<dyn Task>) {
        let id = self.tasks.len();
        info!(task = id, %label, "task registered");
        self.tasks.push(Arc::new(Slot {
            id,
            label,
            task: Mutex::new(task),
            in_flight: AtomicBool::new(false),
        }));
    }

    /// Spawn the worker pool and the polling loop. Returns the handle used
    /// to stop the scheduler.
    pub fn start(self) -> SchedulerHandle {
        let pool_size = self.config.workers.max(1);
        let capacity = self.config.queue_capacity.max(1);
        let tick = Duration::from_millis(self.config.tick_ms.max(1));

        let (queue_tx, queue_rx) = mpsc::channel::<Arc<Slot>>(capacity);
        let queue_rx = Arc::new(tokio::sync::Mutex::new(queue_rx));

        let workers = (0..pool_size)
            .map(|id| tokio::spawn(worker_loop(id, Arc::clone(&queue_rx))))
            .collect();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poller = tokio::spawn(poll_loop(self.tasks, queue_tx, shutdown_rx, tick));

        SchedulerHandle {
            shutdown: shutdown_tx,
            poller,
            workers,
        }
    }
}

/// Stop handle returned by [`Scheduler::start`].
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    poller: JoinHandle<()>,
    workers: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Stop polling, let the workers drain already-queued work, and join
    /// every spawned task before returning.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.poller.await;
        for worker in self.workers {
            let _ = worker.await;
        }
        info!("scheduler stopped");
    }
}

/// Scan tasks in registration order on every tick and push due ones onto the
/// bounded dispatch queue. The `send` blocks when the queue is full — the
/// scheduler's only backpressure mechanism, throttling the scan while the
/// workers catch up.
async fn poll_loop(
    tasks: Vec<Arc<Slot>>,
    queue: mpsc::Sender<Arc<Slot>>,
    mut shutdown: watch::Receiver<bool>,
    tick: Duration,
) {
    info!(tasks = tasks.len(), tick_ms = tick.as_millis() as u64, "scheduler started");
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Utc::now();
                for slot in &tasks {
                    if slot.in_flight.load(Ordering::Acquire) {
                        continue;
                    }
                    let due = slot.task.lock().unwrap().is_due(now);
                    if !due {
                        continue;
                    }
                    slot.in_flight.store(true, Ordering::Release);
                    debug!(task = slot.id, label = %slot.label, "dispatching");
                    if queue.send(Arc::clone(slot)).await.is_err() {
                        error!("dispatch queue closed, stopping poll loop");
                        return;
                    }
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("scheduler stopping");
                    break;
                }
            }
        }
    }
    // the queue sender drops here; workers drain what is already queued,
    // observe the closed channel, and exit
}

/// Pop slots off the shared queue and execute them. A panicking job is
/// caught and logged so one task's failure never takes the worker — or any
/// other task — down with it.
async fn worker_loop(id: usize, queue: Arc<tokio::sync::Mutex<mpsc::Receiver<Arc<Slot>>>>) {
    debug!(worker = id, "worker started");
    loop {
        let slot = { queue.lock().await.recv().await };
        let Some(slot) = slot else {
            break;
        };

        let now = Utc::now();
        let outcome = {
            let mut task = slot.task.lock().unwrap();
            catch_unwind(AssertUnwindSafe(|| task.run(now)))
        };
        if outcome.is_err() {
            error!(worker = id, task = slot.id, label = %slot.label, "job panicked");
        }
        slot.in_flight.store(false, Ordering::Release);
    }
    debug!(worker = id, "worker exiting");
}
