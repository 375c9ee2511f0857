//! Progress accounting for export runs.
//!
//! The executor reports an [`ExportProgress`] after every processed order.
//! Rendering is left to a [`ProgressObserver`]; this module ships a no-op
//! observer and a log-based one that emits an update every N percent.

use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;

const DEFAULT_PERCENTAGE_STEP: f64 = 10.0;

/// Completion snapshot after one order has been processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    /// Orders processed so far (1-based)
    pub completed: usize,
    /// Orders in the fetched collection
    pub total: usize,
}

impl ExportProgress {
    /// Completed share in `0.0..=1.0`.
    ///
    /// Never constructed with `total == 0`; the executor skips reporting for
    /// empty collections.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }

    /// Completed share in percent
    pub fn percentage(&self) -> f64 {
        self.fraction() * 100.0
    }

    /// Whether this is the final update of the run
    pub fn is_finished(&self) -> bool {
        self.completed >= self.total
    }
}

/// Receives progress snapshots from the executor
pub trait ProgressObserver: Send + Sync {
    /// Called once per processed order
    fn on_progress(&self, progress: ExportProgress);
}

/// Observer that ignores updates
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _progress: ExportProgress) {}
}

/// Observer that logs an update each time completion crosses a step
#[derive(Debug)]
pub struct LogProgress {
    min_percentage_step: f64,
    state: Mutex<LogState>,
}

#[derive(Debug)]
struct LogState {
    start_time: Instant,
    last_reported_percentage: f64,
}

impl LogProgress {
    /// Log every `min_percentage_step` percent
    pub fn new(min_percentage_step: f64) -> Self {
        Self {
            min_percentage_step,
            state: Mutex::new(LogState {
                start_time: Instant::now(),
                last_reported_percentage: 0.0,
            }),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(DEFAULT_PERCENTAGE_STEP)
    }
}

impl ProgressObserver for LogProgress {
    fn on_progress(&self, progress: ExportProgress) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let pct = progress.percentage();
        let step_reached = pct - state.last_reported_percentage >= self.min_percentage_step;
        if step_reached || progress.is_finished() {
            info!(
                "{}",
                format_progress(progress, state.start_time.elapsed())
            );
            state.last_reported_percentage = pct;
        }
    }
}

/// Estimate remaining time from elapsed time and completed share
pub fn estimate_remaining(progress: ExportProgress, elapsed: Duration) -> Option<Duration> {
    let ratio = progress.fraction();
    if !(ratio > 0.0 && ratio < 1.0) {
        return None;
    }
    let elapsed = elapsed.as_secs_f64();
    if elapsed <= 0.0 {
        return None;
    }
    let total_secs = elapsed / ratio;
    Some(Duration::from_secs_f64((total_secs - elapsed).max(0.0)))
}

/// Human-readable progress string for logging
pub fn format_progress(progress: ExportProgress, elapsed: Duration) -> String {
    let mut parts = vec![format!(
        "[PROGRESS] Processed {}/{} orders - {:.1}% complete",
        progress.completed,
        progress.total,
        progress.percentage()
    )];

    if let Some(remaining) = estimate_remaining(progress, elapsed) {
        parts.push(format!("- ~{} remaining", format_duration(remaining)));
    }

    parts.join(" ")
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{:.1}h", secs as f64 / 3600.0)
    }
}
