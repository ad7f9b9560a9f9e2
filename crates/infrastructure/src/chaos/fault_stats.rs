//! Fault injection statistics

use std::sync::atomic::{AtomicU64, Ordering};

use domain::FaultOutcome;
use serde::Serialize;

/// Lock-free counters shared by concurrent callers of one injector
#[derive(Debug, Default)]
pub struct FaultStats {
    total_calls: AtomicU64,
    calls_skipped: AtomicU64,
    faults_injected: AtomicU64,
    delays_injected: AtomicU64,
    aborts_injected: AtomicU64,
    delayed_aborts: AtomicU64,
    total_delay_ms: AtomicU64,
}

impl FaultStats {
    /// Create zeroed counters
    pub const fn new() -> Self {
        Self {
            total_calls: AtomicU64::new(0),
            calls_skipped: AtomicU64::new(0),
            faults_injected: AtomicU64::new(0),
            delays_injected: AtomicU64::new(0),
            aborts_injected: AtomicU64::new(0),
            delayed_aborts: AtomicU64::new(0),
            total_delay_ms: AtomicU64::new(0),
        }
    }

    /// Record a call being processed
    pub fn record_call(&self) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call that was forwarded untouched
    pub fn record_skip(&self) {
        self.calls_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the fault carried by an outcome
    ///
    /// A pass counts as a skip.
    pub fn record_outcome(&self, outcome: &FaultOutcome) {
        if outcome.is_pass() {
            self.record_skip();
            return;
        }
        self.faults_injected.fetch_add(1, Ordering::Relaxed);

        if let Some(delay) = outcome.delay() {
            self.delays_injected.fetch_add(1, Ordering::Relaxed);
            let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
            // Saturate instead of wrapping on absurd delays
            let _ = self
                .total_delay_ms
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| {
                    Some(total.saturating_add(millis))
                });
        }
        if outcome.abort().is_some() {
            self.aborts_injected.fetch_add(1, Ordering::Relaxed);
        }
        if matches!(outcome, FaultOutcome::DelayThenAbort { .. }) {
            self.delayed_aborts.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Copy the current counter values
    pub fn snapshot(&self) -> FaultStatsSnapshot {
        FaultStatsSnapshot {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            calls_skipped: self.calls_skipped.load(Ordering::Relaxed),
            faults_injected: self.faults_injected.load(Ordering::Relaxed),
            delays_injected: self.delays_injected.load(Ordering::Relaxed),
            aborts_injected: self.aborts_injected.load(Ordering::Relaxed),
            delayed_aborts: self.delayed_aborts.load(Ordering::Relaxed),
            total_delay_ms: self.total_delay_ms.load(Ordering::Relaxed),
        }
    }

    /// Zero every counter
    pub fn reset(&self) {
        for counter in [
            &self.total_calls,
            &self.calls_skipped,
            &self.faults_injected,
            &self.delays_injected,
            &self.aborts_injected,
            &self.delayed_aborts,
            &self.total_delay_ms,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time copy of [`FaultStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FaultStatsSnapshot {
    /// Total number of calls processed
    pub total_calls: u64,
    /// Calls forwarded untouched
    pub calls_skipped: u64,
    /// Calls that received a delay, an abort, or both
    pub faults_injected: u64,
    /// Calls that were delayed
    pub delays_injected: u64,
    /// Calls that were aborted
    pub aborts_injected: u64,
    /// Calls that were delayed and then aborted
    pub delayed_aborts: u64,
    /// Total latency added (milliseconds)
    pub total_delay_ms: u64,
}

impl FaultStatsSnapshot {
    /// Calculate the actual fault rate
    #[allow(clippy::cast_precision_loss)]
    pub fn actual_fault_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.faults_injected as f64 / self.total_calls as f64
        }
    }

    /// Fraction of calls that were delayed
    #[allow(clippy::cast_precision_loss)]
    pub fn delay_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.delays_injected as f64 / self.total_calls as f64
        }
    }

    /// Fraction of calls that were aborted
    #[allow(clippy::cast_precision_loss)]
    pub fn abort_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.aborts_injected as f64 / self.total_calls as f64
        }
    }
}
