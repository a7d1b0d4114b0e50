//! Sources of interpolation fractions for the emission schedule.
//!
//! Every random choice the simulator makes (color, velocity, lifetime,
//! delay) is a fraction in `[0, 1]` drawn from a [`FractionSource`]. The
//! simulator draws four per emission, always in that order. Injecting the
//! source makes runs reproducible and lets tests script exact values.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A stream of fractions in `[0, 1]`.
pub trait FractionSource {
    /// Draw the next fraction.
    fn next_fraction(&mut self) -> f32;
}

impl<F: FractionSource + ?Sized> FractionSource for &mut F {
    fn next_fraction(&mut self) -> f32 {
        (**self).next_fraction()
    }
}

/// Seeded pseudo-random fractions in `[0, 1)`.
///
/// Two sources built from the same seed yield the same sequence.
#[derive(Debug, Clone)]
pub struct SeededFractions {
    rng: SmallRng,
}

impl SeededFractions {
    /// Create a source from an explicit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl FractionSource for SeededFractions {
    fn next_fraction(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Always yields the same fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantFraction(f32);

impl ConstantFraction {
    /// Create a constant source. The value is clamped into `[0, 1]`; NaN
    /// becomes 0.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// The fraction this source yields.
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl FractionSource for ConstantFraction {
    fn next_fraction(&mut self) -> f32 {
        self.0
    }
}

/// Replays a fixed list of fractions, wrapping around at the end.
///
/// An empty script yields 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedFractions {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedFractions {
    /// Create a script. Values are clamped into `[0, 1]` like
    /// [`ConstantFraction::new`].
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|v| ConstantFraction::new(v).value())
                .collect(),
            cursor: 0,
        }
    }

    /// Number of fractions drawn so far.
    pub const fn drawn(&self) -> usize {
        self.cursor
    }
}

impl FractionSource for ScriptedFractions {
    fn next_fraction(&mut self) -> f32 {
        let at = self.cursor.checked_rem(self.values.len()).unwrap_or(0);
        self.cursor = self.cursor.saturating_add(1);
        self.values.get(at).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_repeat() {
        let mut a = SeededFractions::new(42);
        let mut b = SeededFractions::new(42);
        let xs: Vec<f32> = (0..32).map(|_| a.next_fraction()).collect();
        let ys: Vec<f32> = (0..32).map(|_| b.next_fraction()).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|k| (0.0..1.0).contains(k)));
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededFractions::new(1);
        let mut b = SeededFractions::new(2);
        let xs: Vec<f32> = (0..8).map(|_| a.next_fraction()).collect();
        let ys: Vec<f32> = (0..8).map(|_| b.next_fraction()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn constant_is_clamped() {
        assert_eq!(ConstantFraction::new(1.5).value(), 1.0);
        assert_eq!(ConstantFraction::new(-0.5).value(), 0.0);
        assert_eq!(ConstantFraction::new(f32::NAN).value(), 0.0);
        let mut c = ConstantFraction::new(0.25);
        assert_eq!(c.next_fraction(), 0.25);
        assert_eq!(c.next_fraction(), 0.25);
    }

    #[test]
    fn script_wraps() {
        let mut s = ScriptedFractions::new([0.1, 0.9]);
        let drawn: Vec<f32> = (0..5).map(|_| s.next_fraction()).collect();
        assert_eq!(drawn, vec![0.1, 0.9, 0.1, 0.9, 0.1]);
        assert_eq!(s.drawn(), 5);
    }

    #[test]
    fn empty_script_yields_zero() {
        let mut s = ScriptedFractions::default();
        assert_eq!(s.next_fraction(), 0.0);
    }

    fn draw<F: FractionSource>(mut source: F) -> f32 {
        source.next_fraction()
    }

    #[test]
    fn borrowed_source_advances_owner() {
        let mut s = ScriptedFractions::new([0.2, 0.4, 0.6]);
        assert_eq!(draw(&mut s), 0.2);
        assert_eq!(draw(&mut s), 0.4);
        assert_eq!(s.drawn(), 2);
        assert_eq!(s.next_fraction(), 0.6);
    }
}
