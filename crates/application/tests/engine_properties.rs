//! Property-based tests for the fault decision engine

use std::time::Duration;

use application::{FaultDecisionEngine, FixedSequence, NoHeaders};
use domain::{AbortCode, AbortSpec, DelaySpec, FaultOutcome, FaultPolicy, Percent};
use proptest::prelude::*;

proptest! {
    #[test]
    fn selection_follows_draw_threshold(percent in 0.0f64..=100.0f64, draw in 0.0f64..1.0f64) {
        let engine = FaultDecisionEngine::new();
        let spec = AbortSpec::http_status(503).with_percent(Percent::new(percent).unwrap());
        let mut rng = FixedSequence::constant(draw);

        let aborted = engine.evaluate_abort(Some(&spec), &NoHeaders, &mut rng).is_some();
        prop_assert_eq!(aborted, draw * 100.0 < percent);
    }

    #[test]
    fn zero_percent_never_injects(draws in proptest::collection::vec(0.0f64..1.0f64, 1..64)) {
        let engine = FaultDecisionEngine::new();
        let policy = FaultPolicy::delay(
            DelaySpec::fixed(Duration::from_secs(1)).with_percent(Percent::NEVER),
        )
        .with_abort(AbortSpec::http_status(500).with_percent(Percent::NEVER));
        let mut rng = FixedSequence::new(draws.clone());

        for _ in 0..draws.len() {
            prop_assert_eq!(engine.decide(&policy, &NoHeaders, &mut rng), FaultOutcome::Pass);
        }
    }

    #[test]
    fn full_percent_always_injects(draws in proptest::collection::vec(0.0f64..1.0f64, 1..64)) {
        let engine = FaultDecisionEngine::new();
        let policy = FaultPolicy::delay(
            DelaySpec::fixed(Duration::from_millis(10)).with_percent(Percent::ALWAYS),
        )
        .with_abort(AbortSpec::grpc_status("UNAVAILABLE"));
        let mut rng = FixedSequence::new(draws.clone());

        for _ in 0..draws.len() {
            prop_assert_eq!(
                engine.decide(&policy, &NoHeaders, &mut rng),
                FaultOutcome::DelayThenAbort {
                    duration: Duration::from_millis(10),
                    code: AbortCode::GrpcStatus("UNAVAILABLE".to_string()),
                }
            );
        }
    }

    #[test]
    fn exponential_samples_are_finite_and_non_negative(
        mean_ms in 0u64..60_000u64,
        draw in 0.0f64..1.0f64
    ) {
        let engine = FaultDecisionEngine::new();
        let spec = DelaySpec::exponential(Duration::from_millis(mean_ms));
        let mut rng = FixedSequence::new([0.0, draw]);

        let sample = engine.evaluate_delay(Some(&spec), &NoHeaders, &mut rng);
        prop_assert!(sample.is_some());
        // -ln(1 - u) stays below 37 for any u < 1 representable as f64
        prop_assert!(sample.unwrap() <= Duration::from_millis(mean_ms) * 37);
    }
}
