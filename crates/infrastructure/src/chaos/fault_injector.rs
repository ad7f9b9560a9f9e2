//! Fault injector for request pipelines.
//!
//! Wraps a [`FaultDecisionEngine`] and one route's policy with operational
//! safety gates, then enforces the resulting decision around an async
//! operation.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use application::{FaultDecisionEngine, RandomSource, RequestHeaders};
use domain::{AbortCode, FaultOutcome, FaultPolicy};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use super::{FaultStats, FaultStatsSnapshot};

/// Configuration for the fault injector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaultInjectorConfig {
    /// Whether fault injection is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Stop injecting after this many faults
    #[serde(default)]
    pub max_faults: Option<u64>,
    /// Minimum time between fault injections (milliseconds)
    #[serde(default)]
    pub cooldown_ms: Option<u64>,
}

const fn default_enabled() -> bool {
    true
}

impl Default for FaultInjectorConfig {
    fn default() -> Self {
        Self::enabled()
    }
}

impl FaultInjectorConfig {
    /// Create a new config with fault injection enabled
    pub const fn enabled() -> Self {
        Self {
            enabled: true,
            max_faults: None,
            cooldown_ms: None,
        }
    }

    /// Create a new config with fault injection disabled
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            max_faults: None,
            cooldown_ms: None,
        }
    }

    /// Set the cooldown period between injections
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown_ms = Some(u64::try_from(cooldown.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Limit the total number of injected faults
    pub const fn with_max_faults(mut self, max_faults: u64) -> Self {
        self.max_faults = Some(max_faults);
        self
    }

    /// Cooldown period between injections
    pub const fn cooldown(&self) -> Option<Duration> {
        match self.cooldown_ms {
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        }
    }
}

/// Abort returned in place of the wrapped operation's result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Injected abort: {code}")]
pub struct InjectedAbort {
    /// Error the caller should see
    pub code: AbortCode,
    /// Delay that elapsed before the abort, if any
    pub delayed: Option<Duration>,
}

impl InjectedAbort {
    /// HTTP status to respond with, for HTTP aborts
    pub const fn http_status(&self) -> Option<u16> {
        self.code.http_status()
    }
}

/// Why a call was not offered to the decision engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Open,
    Disabled,
    LimitReached,
    Cooldown,
}

/// Fault injector for one route's policy
///
/// Safe to share between tasks; every caller supplies its own random
/// source.
#[derive(Debug)]
pub struct FaultInjector {
    engine: FaultDecisionEngine,
    policy: Arc<FaultPolicy>,
    config: FaultInjectorConfig,
    stats: FaultStats,
    last_injection: RwLock<Option<Instant>>,
    remaining_faults: Option<AtomicU64>,
}

impl FaultInjector {
    /// Create a new fault injector with the given policy
    pub fn new(engine: FaultDecisionEngine, policy: impl Into<Arc<FaultPolicy>>) -> Self {
        Self::with_config(engine, policy, FaultInjectorConfig::default())
    }

    /// Create a new fault injector with custom configuration
    pub fn with_config(
        engine: FaultDecisionEngine,
        policy: impl Into<Arc<FaultPolicy>>,
        config: FaultInjectorConfig,
    ) -> Self {
        Self {
            engine,
            policy: policy.into(),
            remaining_faults: config.max_faults.map(AtomicU64::new),
            config,
            stats: FaultStats::new(),
            last_injection: RwLock::new(None),
        }
    }

    /// Create a disabled fault injector (no-op)
    pub fn disabled() -> Self {
        Self::with_config(
            FaultDecisionEngine::new(),
            FaultPolicy::none(),
            FaultInjectorConfig::disabled(),
        )
    }

    /// Policy evaluated by this injector
    pub fn policy(&self) -> &FaultPolicy {
        &self.policy
    }

    fn gate(&self) -> Gate {
        if !self.config.enabled {
            return Gate::Disabled;
        }

        if self
            .remaining_faults
            .as_ref()
            .is_some_and(|remaining| remaining.load(Ordering::SeqCst) == 0)
        {
            return Gate::LimitReached;
        }

        let last_injection = *self.last_injection.read();
        match (self.config.cooldown(), last_injection) {
            (Some(cooldown), Some(last)) if last.elapsed() < cooldown => Gate::Cooldown,
            _ => Gate::Open,
        }
    }

    /// Claim one fault from the limit, if there is one
    fn claim_fault(&self) -> bool {
        self.remaining_faults.as_ref().is_none_or(|remaining| {
            remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        })
    }

    /// Decide whether to inject a fault into this request
    ///
    /// Closed gates pass the request without drawing randomness.
    pub fn maybe_inject<H, R>(&self, request: &H, rng: &mut R) -> FaultOutcome
    where
        H: RequestHeaders + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.stats.record_call();

        let gate = self.gate();
        if gate != Gate::Open {
            trace!(gate = ?gate, "Fault injection skipped");
            self.stats.record_skip();
            return FaultOutcome::Pass;
        }

        let mut outcome = self.engine.decide(&self.policy, request, rng);
        if !outcome.is_pass() {
            if self.claim_fault() {
                *self.last_injection.write() = Some(Instant::now());
            } else {
                debug!(outcome = %outcome, "Fault limit reached, passing request");
                outcome = FaultOutcome::Pass;
            }
        }

        self.stats.record_outcome(&outcome);
        outcome
    }

    /// Wrap an async operation with potential fault injection
    ///
    /// A delay elapses before the operation runs. An abort replaces the
    /// operation's result, which is then never awaited.
    pub async fn wrap<F, T, E, H, R>(&self, request: &H, rng: &mut R, operation: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<InjectedAbort>,
        H: RequestHeaders + ?Sized,
        R: RandomSource + ?Sized,
    {
        let outcome = self.maybe_inject(request, rng);
        enforce(outcome, operation).await
    }

    /// Get current statistics
    pub fn stats(&self) -> FaultStatsSnapshot {
        self.stats.snapshot()
    }

    /// Reset the injector state
    pub fn reset(&self) {
        self.stats.reset();
        *self.last_injection.write() = None;
        if let (Some(remaining), Some(max)) = (&self.remaining_faults, self.config.max_faults) {
            remaining.store(max, Ordering::SeqCst);
        }
    }

    /// Get remaining fault count (if limited)
    pub fn remaining_faults(&self) -> Option<u64> {
        self.remaining_faults
            .as_ref()
            .map(|r| r.load(Ordering::SeqCst))
    }
}

/// Apply a fault decision to an async operation
pub async fn enforce<F, T, E>(outcome: FaultOutcome, operation: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<InjectedAbort>,
{
    match outcome {
        FaultOutcome::Pass => operation.await,
        FaultOutcome::Delay { duration } => {
            tokio::time::sleep(duration).await;
            operation.await
        },
        FaultOutcome::Abort { code } => Err(InjectedAbort {
            code,
            delayed: None,
        }
        .into()),
        FaultOutcome::DelayThenAbort { duration, code } => {
            tokio::time::sleep(duration).await;
            Err(InjectedAbort {
                code,
                delayed: Some(duration),
            }
            .into())
        },
    }
}
