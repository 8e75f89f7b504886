// End-to-end checks of the polling loop, worker pool, and shutdown policy.
// Tick intervals are shortened so each test finishes in a few seconds.

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tempo_scheduler::{Scheduler, SchedulerConfig};

fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn config(tick_ms: u64, workers: usize) -> SchedulerConfig {
    SchedulerConfig {
        tick_ms,
        workers,
        queue_capacity: 10,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interval_task_fires_on_its_period() {
    init_logs();
    let runs = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&runs);

    let mut scheduler = Scheduler::new(config(50, 2));
    scheduler
        .schedule_interval()
        .second(1)
        .unwrap()
        .run(move || log.lock().unwrap().push(Instant::now()))
        .unwrap();

    let handle = scheduler.start();
    tokio::time::sleep(Duration::from_millis(2600)).await;
    handle.stop().await;

    let runs = runs.lock().unwrap();
    assert!(runs.len() >= 2, "expected at least 2 runs, got {}", runs.len());
    let gap = runs[1] - runs[0];
    assert!(gap >= Duration::from_millis(900), "gap too short: {gap:?}");
    assert!(gap <= Duration::from_millis(1500), "gap too long: {gap:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slow_task_never_runs_concurrently_with_itself() {
    init_logs();
    let active = Arc::new(AtomicI32::new(0));
    let peak = Arc::new(AtomicI32::new(0));
    let runs = Arc::new(AtomicUsize::new(0));

    let (active2, peak2, runs2) = (Arc::clone(&active), Arc::clone(&peak), Arc::clone(&runs));
    let mut scheduler = Scheduler::new(config(20, 4));
    // zero period: due on every tick, so only the in-flight guard keeps the
    // executions from overlapping while each run outlasts many ticks
    scheduler
        .schedule_interval()
        .run(move || {
            let now_active = active2.fetch_add(1, Ordering::SeqCst) + 1;
            peak2.fetch_max(now_active, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(150));
            active2.fetch_sub(1, Ordering::SeqCst);
            runs2.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    let handle = scheduler.start();
    tokio::time::sleep(Duration::from_millis(800)).await;
    handle.stop().await;

    assert!(runs.load(Ordering::SeqCst) >= 2);
    assert_eq!(peak.load(Ordering::SeqCst), 1, "task overlapped with itself");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stop_drains_queued_work_and_joins_workers() {
    init_logs();
    let runs = Arc::new(AtomicUsize::new(0));
    let runs2 = Arc::clone(&runs);

    let mut scheduler = Scheduler::new(config(20, 2));
    scheduler
        .schedule_interval()
        .run(move || {
            runs2.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    let handle = scheduler.start();
    tokio::time::sleep(Duration::from_millis(300)).await;
    handle.stop().await;

    // after stop returns every worker has been joined, so the count is final
    let settled = runs.load(Ordering::SeqCst);
    assert!(settled >= 2);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(runs.load(Ordering::SeqCst), settled);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn first_dispatch_follows_registration_order() {
    init_logs();
    let order = Arc::new(Mutex::new(Vec::new()));

    // single worker, so the first tick's dispatches execute in queue order
    let mut scheduler = Scheduler::new(config(30, 1));
    for name in ["a", "b"] {
        let log = Arc::clone(&order);
        scheduler
            .schedule_interval()
            .run(move || log.lock().unwrap().push(name))
            .unwrap();
    }

    let handle = scheduler.start();
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.stop().await;

    let order = order.lock().unwrap();
    assert!(order.len() >= 2);
    assert_eq!(&order[..2], &["a", "b"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn panicking_task_does_not_stop_the_others() {
    init_logs();
    let runs = Arc::new(AtomicUsize::new(0));
    let runs2 = Arc::clone(&runs);

    let mut scheduler = Scheduler::new(config(20, 2));
    scheduler
        .schedule_interval()
        .run(|| panic!("intentional test panic"))
        .unwrap();
    scheduler
        .schedule_interval()
        .run(move || {
            runs2.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    let handle = scheduler.start();
    tokio::time::sleep(Duration::from_millis(400)).await;
    handle.stop().await;

    assert!(
        runs.load(Ordering::SeqCst) >= 2,
        "healthy task starved by a panicking sibling"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn malformed_cron_fails_registration() {
    let mut scheduler = Scheduler::new(config(50, 2));
    assert!(scheduler.schedule_cron("* * * * *", || {}).is_err());
    assert!(scheduler.schedule_cron("61 * * * * *", || {}).is_err());
    assert_eq!(scheduler.task_count(), 0);

    scheduler.schedule_cron("*/5 * * * * *", || {}).unwrap();
    assert_eq!(scheduler.task_count(), 1);
}
