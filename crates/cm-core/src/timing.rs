//! Lightweight performance timing utilities.
//!
//! Timers are inert unless enabled programmatically or through the
//! `CM_TIMING` environment variable. Results are reported through `tracing`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable performance timing globally.
pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Disable performance timing globally.
pub fn disable_timing() {
    ENABLED.store(false, Ordering::Relaxed);
}

/// Check if timing is enabled.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var("CM_TIMING").is_ok()
}

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
    enabled: bool,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
            enabled: is_enabled(),
        }
    }

    /// Stop the timer and return elapsed time in seconds.
    /// If timing is disabled, returns None.
    pub fn stop(self) -> Option<f64> {
        if self.enabled {
            Some(self.start.elapsed().as_secs_f64())
        } else {
            None
        }
    }

    /// Stop the timer and log the result if enabled.
    pub fn stop_and_log(self) {
        let label = self.label;
        if let Some(elapsed) = self.stop() {
            tracing::info!(stage = label, elapsed_s = elapsed, "timing");
        }
    }
}

/// Wall-clock breakdown of one mapping run.
#[derive(Debug, Clone, Default)]
pub struct StageTimes {
    pub load_s: f64,
    pub build_s: f64,
    pub hour_loop_s: f64,
    pub aggregate_s: f64,
    pub write_s: f64,
    pub hours: usize,
}

impl StageTimes {
    /// Log a formatted summary of the statistics.
    pub fn log_summary(&self) {
        if !is_enabled() {
            return;
        }
        tracing::info!(
            load_s = self.load_s,
            build_s = self.build_s,
            hour_loop_s = self.hour_loop_s,
            aggregate_s = self.aggregate_s,
            write_s = self.write_s,
            hours = self.hours,
            "run timing summary"
        );
        if self.hours > 0 {
            tracing::info!(
                avg_hour_ms = self.hour_loop_s / self.hours as f64 * 1000.0,
                "average hour time"
            );
        }
    }
}
