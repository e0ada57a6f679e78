//! Run metrics and logging setup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Ticks between two progress log lines.
pub const DEFAULT_LOG_INTERVAL: u64 = 100;

/// Counters updated once per completed tick.
pub struct Metrics {
    tick_count: AtomicU64,
    active_cells: AtomicU64,
    stars_formed: AtomicU64,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::with_log_interval(DEFAULT_LOG_INTERVAL)
    }

    #[must_use]
    pub fn with_log_interval(log_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            active_cells: AtomicU64::new(0),
            stars_formed: AtomicU64::new(0),
            log_interval: log_interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, active_cells: usize, stars_formed: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.active_cells
            .store(active_cells as u64, Ordering::Relaxed);
        self.stars_formed
            .fetch_add(stars_formed as u64, Ordering::Relaxed);

        if tick % self.log_interval == 0 {
            tracing::info!(
                tick = tick,
                active_cells = active_cells,
                stars_formed = stars_formed,
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    /// Active cells after the last recorded tick.
    #[must_use]
    pub fn active_cells(&self) -> u64 {
        self.active_cells.load(Ordering::Relaxed)
    }

    /// Stars formed over all recorded ticks.
    #[must_use]
    pub fn total_stars_formed(&self) -> u64 {
        self.stars_formed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}
