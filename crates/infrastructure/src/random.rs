//! `rand`-backed random sources
//!
//! Give every worker its own [`RngSource`]; the engine never shares one.

use application::RandomSource;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Random source backed by any [`rand::Rng`]
#[derive(Debug, Clone)]
pub struct RngSource<R = StdRng> {
    rng: R,
}

impl RngSource<StdRng> {
    /// Deterministic source for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from the operating system
    pub fn from_os() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl RngSource<ThreadRng> {
    /// Source backed by the thread-local generator
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Unwrap the generator
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use application::{FaultDecisionEngine, NoHeaders};
    use domain::{AbortSpec, DelaySpec, Percent};

    use super::*;

    const TRIALS: u32 = 10_000;

    #[test]
    fn draws_are_in_unit_interval() {
        let mut source = RngSource::seeded(7);
        for _ in 0..TRIALS {
            let u = source.next_unit();
            assert!((0.0..1.0).contains(&u), "{u} outside [0, 1)");
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.next_unit().to_bits(), b.next_unit().to_bits());
        }
    }

    #[test]
    fn thread_source_draws() {
        let mut source = RngSource::thread();
        let u = source.next_unit();
        assert!((0.0..1.0).contains(&u));
    }

    #[test]
    fn selection_rate_tracks_percent() {
        let engine = FaultDecisionEngine::new();
        for percent in [1.0, 25.0, 50.0, 90.0] {
            let spec = AbortSpec::http_status(503).with_percent(Percent::new(percent).unwrap());
            let mut source = RngSource::seeded(1234);

            let hits = (0..TRIALS)
                .filter(|_| {
                    engine
                        .evaluate_abort(Some(&spec), &NoHeaders, &mut source)
                        .is_some()
                })
                .count();

            let rate = f64::from(u32::try_from(hits).unwrap()) / f64::from(TRIALS) * 100.0;
            assert!(
                (rate - percent).abs() < 2.0,
                "percent {percent} selected at rate {rate}"
            );
        }
    }

    #[test]
    fn exponential_mean_converges() {
        let engine = FaultDecisionEngine::new();
        let mean = Duration::from_millis(100);
        let spec = DelaySpec::exponential(mean);
        let mut source = RngSource::seeded(99);

        let total: Duration = (0..TRIALS)
            .map(|_| {
                engine
                    .evaluate_delay(Some(&spec), &NoHeaders, &mut source)
                    .unwrap()
            })
            .sum();

        let observed = total.as_secs_f64() / f64::from(TRIALS);
        assert!(
            (observed - 0.1).abs() < 0.01,
            "observed mean {observed}s for 0.1s"
        );
    }
}
