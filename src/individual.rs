//! A single candidate guess.
//!
//! [`Individual`] carries one integer value, the bounds it must stay inside,
//! and an optional fitness score. Bounds are copied from the population
//! configuration at creation time so that offspring remain valid without
//! consulting any global state.

use rand::Rng;
use std::fmt;

/// One candidate guess in the population.
///
/// # Invariants
///
/// - `value` is always within `[min_value, max_value]` (inclusive).
///   Every write path clamps.
/// - `fitness`, when set, is within `[0, 100]`. It is `None` until the
///   individual has been evaluated for the current generation.
///
/// Cloning preserves fitness; this is what elite carry-over relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    value: i64,
    fitness: Option<f64>,
    min_value: i64,
    max_value: i64,
}

impl Individual {
    /// Creates an individual with a uniformly random value in the bounds.
    pub fn random<R: Rng>(min_value: i64, max_value: i64, rng: &mut R) -> Self {
        let (min_value, max_value) = ordered(min_value, max_value);
        Self {
            value: rng.random_range(min_value..=max_value),
            fitness: None,
            min_value,
            max_value,
        }
    }

    /// Creates an individual with an explicit value, clamped into the bounds.
    pub fn with_value(value: i64, min_value: i64, max_value: i64) -> Self {
        let (min_value, max_value) = ordered(min_value, max_value);
        Self {
            value: value.min(max_value).max(min_value),
            fitness: None,
            min_value,
            max_value,
        }
    }

    /// The current guess.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Sets the guess, clamping into the bounds. Clears the fitness, since
    /// the stored score no longer describes the new value.
    pub fn set_value(&mut self, value: i64) {
        self.value = value.min(self.max_value).max(self.min_value);
        self.fitness = None;
    }

    /// The fitness assigned by the last evaluation, if any.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Stores the fitness computed for the current generation.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Lower bound (inclusive).
    pub fn min_value(&self) -> i64 {
        self.min_value
    }

    /// Upper bound (inclusive).
    pub fn max_value(&self) -> i64 {
        self.max_value
    }

    /// `(min_value, max_value)`.
    pub fn bounds(&self) -> (i64, i64) {
        (self.min_value, self.max_value)
    }

    /// Width of the value range, `max_value - min_value`.
    pub fn span(&self) -> i64 {
        self.max_value - self.min_value
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fitness {
            Some(fit) => write!(f, "Individual(value={}, fitness={fit:.2})", self.value),
            None => write!(f, "Individual(value={}, unevaluated)", self.value),
        }
    }
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn test_random_within_bounds() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        for _ in 0..1000 {
            let ind = Individual::random(1, 100, &mut rng);
            assert!((1..=100).contains(&ind.value()));
            assert!(ind.fitness().is_none());
        }
    }

    #[test]
    fn test_with_value_clamps() {
        assert_eq!(Individual::with_value(500, 1, 100).value(), 100);
        assert_eq!(Individual::with_value(-3, 1, 100).value(), 1);
        assert_eq!(Individual::with_value(50, 1, 100).value(), 50);
    }

    #[test]
    fn test_set_value_clamps_and_clears_fitness() {
        let mut ind = Individual::with_value(50, 1, 100);
        ind.set_fitness(77.0);
        ind.set_value(1000);
        assert_eq!(ind.value(), 100);
        assert!(ind.fitness().is_none());
    }

    #[test]
    fn test_clone_preserves_fitness() {
        let mut ind = Individual::with_value(42, 1, 100);
        ind.set_fitness(91.5);
        let copy = ind.clone();
        assert_eq!(copy.value(), 42);
        assert_eq!(copy.fitness(), Some(91.5));
    }

    #[test]
    fn test_reversed_bounds_are_reordered() {
        let ind = Individual::with_value(50, 100, 1);
        assert_eq!(ind.bounds(), (1, 100));
        assert_eq!(ind.value(), 50);
    }

    #[test]
    fn test_single_value_range() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let ind = Individual::random(5, 5, &mut rng);
        assert_eq!(ind.value(), 5);
        assert_eq!(ind.span(), 0);
    }

    #[test]
    fn test_display() {
        let mut ind = Individual::with_value(42, 1, 100);
        assert_eq!(ind.to_string(), "Individual(value=42, unevaluated)");
        ind.set_fitness(93.0);
        assert_eq!(ind.to_string(), "Individual(value=42, fitness=93.00)");
    }
}
