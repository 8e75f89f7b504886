use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Polling cadence of the scheduler loop.
pub const DEFAULT_TICK_MS: u64 = 500;
/// Number of workers consuming the dispatch queue.
pub const DEFAULT_WORKERS: usize = 4;
/// Capacity of the bounded dispatch queue. A full queue blocks the polling
/// loop, which is the scheduler's backpressure mechanism.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Runtime configuration (tempo.toml + TEMPO_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Milliseconds between due-task scans.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Fixed worker pool size.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Bounded dispatch queue capacity.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl SchedulerConfig {
    /// Load config from a TOML file with TEMPO_* env var overrides.
    ///
    /// Falls back to `tempo.toml` in the working directory when no path is
    /// given; a missing file yields the defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path.unwrap_or("tempo.toml");

        let config: SchedulerConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("TEMPO_"))
            .extract()
            .map_err(|e| SchedulerError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}
fn default_workers() -> usize {
    DEFAULT_WORKERS
}
fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}
