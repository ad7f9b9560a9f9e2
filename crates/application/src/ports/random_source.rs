//! Randomness port
//!
//! The fault decision engine never reaches for global randomness. Callers
//! pass a source per evaluation, typically one per thread or task, so tests
//! can replay exact sequences and concurrent requests share no RNG state.

#[cfg(test)]
use mockall::automock;

/// Source of uniformly distributed values
#[cfg_attr(test, automock)]
pub trait RandomSource {
    /// Next value, uniformly distributed in `[0, 1)`
    fn next_unit(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Replays a fixed list of values, cycling when exhausted
///
/// An empty list yields `0.0` forever.
#[derive(Debug, Clone, Default)]
pub struct FixedSequence {
    values: Vec<f64>,
    position: usize,
}

impl FixedSequence {
    /// Create a sequence from the given values
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            position: 0,
        }
    }

    /// Sequence that always yields the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far
    pub const fn drawn(&self) -> usize {
        self.position
    }
}

impl RandomSource for FixedSequence {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_sequence_cycles() {
        let mut seq = FixedSequence::new([0.1, 0.2]);
        assert!((seq.next_unit() - 0.1).abs() < f64::EPSILON);
        assert!((seq.next_unit() - 0.2).abs() < f64::EPSILON);
        assert!((seq.next_unit() - 0.1).abs() < f64::EPSILON);
        assert_eq!(seq.drawn(), 3);
    }

    #[test]
    fn empty_sequence_yields_zero() {
        let mut seq = FixedSequence::default();
        assert!(seq.next_unit().abs() < f64::EPSILON);
        assert_eq!(seq.drawn(), 0);
    }

    fn draw_once<R: RandomSource>(mut source: R) -> f64 {
        source.next_unit()
    }

    #[test]
    fn mutable_reference_forwards() {
        let mut seq = FixedSequence::constant(0.5);
        assert!((draw_once(&mut seq) - 0.5).abs() < f64::EPSILON);
        assert_eq!(seq.drawn(), 1);
    }

    #[test]
    fn boxed_source_forwards() {
        let mut boxed: Box<dyn RandomSource> = Box::new(FixedSequence::constant(0.25));
        assert!((boxed.next_unit() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn mock_source_returns_configured_value() {
        let mut mock = MockRandomSource::new();
        mock.expect_next_unit().times(1).return_const(0.75);
        assert!((mock.next_unit() - 0.75).abs() < f64::EPSILON);
    }
}
