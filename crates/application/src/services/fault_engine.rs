//! Fault decision engine
//!
//! Decides per request whether to delay it, abort it, both, or let it pass.
//! The engine is stateless apart from its header override strategy: policies
//! are read-only inputs and randomness comes from the caller, so a single
//! engine can serve any number of concurrent requests.
//!
//! # Entropy use
//!
//! An absent delay or abort fault draws nothing. A present one draws one
//! value for the percent selection, and an exponential delay draws one more
//! for the sample. The delay is always evaluated before the abort.

use std::sync::Arc;
use std::time::Duration;

use domain::{AbortCode, AbortSpec, DelayKind, DelaySpec, FaultOutcome, FaultPolicy, Percent};
use tracing::{debug, instrument, trace};

use crate::ports::{HeaderOverride, IgnoreOverride, RandomSource, RequestHeaders};

/// Largest `f64` below 1; `100 * UNIT_CEILING` is still strictly below 100
const UNIT_CEILING: f64 = 1.0 - f64::EPSILON / 2.0;

/// Evaluates fault policies against requests
#[derive(Debug, Clone)]
pub struct FaultDecisionEngine {
    header_override: Arc<dyn HeaderOverride>,
}

impl Default for FaultDecisionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FaultDecisionEngine {
    /// Create an engine that ignores override headers
    pub fn new() -> Self {
        Self::with_header_override(Arc::new(IgnoreOverride))
    }

    /// Create an engine with a custom header override strategy
    pub fn with_header_override(header_override: Arc<dyn HeaderOverride>) -> Self {
        Self { header_override }
    }

    /// Decide what to do with one request
    #[instrument(level = "debug", skip_all)]
    pub fn decide<H, R>(&self, policy: &FaultPolicy, request: &H, rng: &mut R) -> FaultOutcome
    where
        H: RequestHeaders + ?Sized,
        R: RandomSource + ?Sized,
    {
        let delay = self.evaluate_delay(policy.delay.as_ref(), request, rng);
        let abort = self.evaluate_abort(policy.abort.as_ref(), request, rng);
        let outcome = FaultOutcome::from_parts(delay, abort);
        debug!(outcome = %outcome, "Fault decision");
        outcome
    }

    /// Delay to inject into one request, if any
    pub fn evaluate_delay<H, R>(
        &self,
        delay: Option<&DelaySpec>,
        request: &H,
        rng: &mut R,
    ) -> Option<Duration>
    where
        H: RequestHeaders + ?Sized,
        R: RandomSource + ?Sized,
    {
        let delay = delay?;
        if !selected(delay.effective_percent(), rng) {
            trace!(percent = %delay.effective_percent(), "Delay not selected");
            return None;
        }

        if let Some(overridden) = delay
            .override_header()
            .and_then(|name| request.header(name))
            .and_then(|value| self.header_override.delay_override(value))
        {
            return Some(overridden);
        }

        match delay.kind? {
            DelayKind::Fixed(duration) => Some(duration),
            DelayKind::Exponential { mean } => Some(sample_exponential(mean, rng)),
        }
    }

    /// Abort code to answer one request with, if any
    pub fn evaluate_abort<H, R>(
        &self,
        abort: Option<&AbortSpec>,
        request: &H,
        rng: &mut R,
    ) -> Option<AbortCode>
    where
        H: RequestHeaders + ?Sized,
        R: RandomSource + ?Sized,
    {
        let abort = abort?;
        if !selected(abort.effective_percent(), rng) {
            trace!(percent = %abort.effective_percent(), "Abort not selected");
            return None;
        }

        abort
            .override_header()
            .and_then(|name| request.header(name))
            .and_then(|value| self.header_override.abort_override(value))
            .or_else(|| abort.code.clone())
    }
}

/// Bernoulli trial: draw `r` in `[0, 100)` and select when `r < percent`
fn selected<R: RandomSource + ?Sized>(percent: Percent, rng: &mut R) -> bool {
    percent.selects(unit_draw(rng) * Percent::MAX)
}

/// Inverse-CDF sample of an exponential distribution with the given mean
fn sample_exponential<R: RandomSource + ?Sized>(mean: Duration, rng: &mut R) -> Duration {
    let u = unit_draw(rng);
    let secs = -mean.as_secs_f64() * (-u).ln_1p();
    if secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

fn unit_draw<R: RandomSource + ?Sized>(rng: &mut R) -> f64 {
    let u = rng.next_unit();
    if u.is_finite() {
        u.clamp(0.0, UNIT_CEILING)
    } else {
        0.0
    }
}
