//! Sweep progress metrics and logging setup.
//!
//! Cells may finish on any worker thread, so every counter is atomic.

use evolattice_data::StopReason;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Per-cell timing and stop-reason counts for a running sweep.
pub struct SweepMetrics {
    total_cells: AtomicU64,
    cells_done: AtomicU64,
    total_steps: AtomicU64,
    total_nanos: AtomicU64,
    min_nanos: AtomicU64,
    max_nanos: AtomicU64,
    reasons: [AtomicU64; 4],
    start_time: Instant,
}

impl Default for SweepMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            total_cells: AtomicU64::new(0),
            cells_done: AtomicU64::new(0),
            total_steps: AtomicU64::new(0),
            total_nanos: AtomicU64::new(0),
            min_nanos: AtomicU64::new(u64::MAX),
            max_nanos: AtomicU64::new(0),
            reasons: Default::default(),
            start_time: Instant::now(),
        }
    }

    /// Announces how many cells the sweep will run.
    pub fn begin(&self, total_cells: usize) {
        self.total_cells.store(total_cells as u64, Ordering::Relaxed);
        tracing::info!(cells = total_cells, "Sweep started");
    }

    /// Records one finished cell and logs the running timing summary.
    pub fn record_cell(&self, duration: Duration, steps: u64, reason: StopReason) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let done = self.cells_done.fetch_add(1, Ordering::Relaxed) + 1;
        self.total_steps.fetch_add(steps, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.min_nanos.fetch_min(nanos, Ordering::Relaxed);
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);
        self.reasons[reason_slot(reason)].fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            cell = done,
            of = self.total_cells.load(Ordering::Relaxed),
            delta_ms = duration.as_millis() as u64,
            min_ms = self.min_cell_time().unwrap_or_default().as_millis() as u64,
            max_ms = self.max_cell_time().unwrap_or_default().as_millis() as u64,
            avg_ms = self.mean_cell_time().unwrap_or_default().as_millis() as u64,
            steps = steps,
            reason = ?reason,
            "Sweep cell finished"
        );
    }

    #[must_use]
    pub fn cells_done(&self) -> u64 {
        self.cells_done.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total_steps(&self) -> u64 {
        self.total_steps.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn min_cell_time(&self) -> Option<Duration> {
        match self.min_nanos.load(Ordering::Relaxed) {
            u64::MAX => None,
            nanos => Some(Duration::from_nanos(nanos)),
        }
    }

    #[must_use]
    pub fn max_cell_time(&self) -> Option<Duration> {
        (self.cells_done() > 0).then(|| Duration::from_nanos(self.max_nanos.load(Ordering::Relaxed)))
    }

    #[must_use]
    pub fn mean_cell_time(&self) -> Option<Duration> {
        let done = self.cells_done();
        (done > 0).then(|| Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed) / done))
    }

    /// How many cells stopped for `reason`.
    #[must_use]
    pub fn reason_count(&self, reason: StopReason) -> u64 {
        self.reasons[reason_slot(reason)].load(Ordering::Relaxed)
    }

    /// Wall-clock time since the metrics were created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs the final summary line.
    pub fn log_summary(&self) {
        tracing::info!(
            cells = self.cells_done(),
            steps = self.total_steps(),
            absorbed = self.reason_count(StopReason::Absorbed),
            timed_out = self.reason_count(StopReason::StopTime),
            capped = self.reason_count(StopReason::MaxSteps),
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Sweep finished"
        );
    }
}

fn reason_slot(reason: StopReason) -> usize {
    match reason {
        StopReason::StopTime => 0,
        StopReason::Absorbed => 1,
        StopReason::MaxSteps => 2,
        StopReason::Cancelled => 3,
    }
}

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG`
/// (default `info`). Output goes to stderr. Calling it twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}
