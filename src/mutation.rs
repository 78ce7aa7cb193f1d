//! Mutation operators.
//!
//! Each operator perturbs one [`Individual`] in place behind a probability
//! gate: when the per-call draw exceeds the gate probability, the value is
//! left untouched. Every write goes through the individual's clamping
//! setter, so mutated values never escape the bounds.

use crate::crossover::bit_width;
use crate::individual::Individual;
use rand::Rng;
use rand_distr::Normal;

/// Per-bit flip probability used by [`MutationMethod::BitFlip`].
const BIT_FLIP_RATE: f64 = 0.1;

/// How many times a zero Gaussian delta is redrawn before giving up.
const GAUSSIAN_RETRIES: usize = 16;

/// Mutation method for perturbing an individual.
///
/// # Examples
///
/// ```
/// use evoguess::MutationMethod;
///
/// assert_eq!(MutationMethod::from_name("gaussian"), MutationMethod::Gaussian);
/// assert_eq!(MutationMethod::from_name("unknown"), MutationMethod::Adaptive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MutationMethod {
    /// Adds a uniform non-zero offset in `[-range, range]`.
    Random,

    /// Flips each bit of the fixed-width pattern independently.
    BitFlip,

    /// Snaps the value to `min_value` or `max_value` (50/50).
    Boundary,

    /// Adds a normally distributed perturbation (mean 0).
    Gaussian,

    /// Scales the probability and range of [`Random`](Self::Random) with
    /// the individual's fitness and the generation number. The default.
    #[default]
    Adaptive,
}

impl MutationMethod {
    /// Looks up a method by its configuration name.
    ///
    /// Unknown names fall back to the default (`adaptive`).
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "random" => Self::Random,
            "bit_flip" => Self::BitFlip,
            "boundary" => Self::Boundary,
            "gaussian" => Self::Gaussian,
            "adaptive" => Self::Adaptive,
            _ => Self::default(),
        }
    }

    /// The configuration name of this method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::BitFlip => "bit_flip",
            Self::Boundary => "boundary",
            Self::Gaussian => "gaussian",
            Self::Adaptive => "adaptive",
        }
    }

    /// Applies this mutation to `individual`.
    ///
    /// `probability` is the gate, `range` the offset bound for
    /// [`Random`](Self::Random), and `generation` the stagnation signal for
    /// [`Adaptive`](Self::Adaptive) (which derives its own probability and
    /// range and ignores the configured ones).
    pub fn apply<R: Rng>(
        &self,
        individual: &mut Individual,
        probability: f64,
        range: i64,
        generation: usize,
        rng: &mut R,
    ) {
        match self {
            Self::Random => random_mutation(individual, range, probability, rng),
            Self::BitFlip => bit_flip_mutation(individual, BIT_FLIP_RATE, probability, rng),
            Self::Boundary => boundary_mutation(individual, probability, rng),
            Self::Gaussian => gaussian_mutation(individual, probability, None, rng),
            Self::Adaptive => adaptive_mutation(individual, generation, rng),
        }
    }
}

/// Adds a uniform non-zero offset in `[-range, range]` to the value.
///
/// The offset is drawn as sign × magnitude so a gate that passes always
/// attempts a change (the clamp can still absorb it at the bounds).
pub fn random_mutation<R: Rng>(
    individual: &mut Individual,
    range: i64,
    probability: f64,
    rng: &mut R,
) {
    if rng.random::<f64>() > probability {
        return;
    }
    let range = range.max(1);
    let magnitude = rng.random_range(1..=range);
    let change = if rng.random_bool(0.5) { magnitude } else { -magnitude };
    individual.set_value(individual.value() + change);
}

/// Flips each bit of the fixed-width pattern independently with
/// probability `per_bit`, behind the `probability` gate.
pub fn bit_flip_mutation<R: Rng>(
    individual: &mut Individual,
    per_bit: f64,
    probability: f64,
    rng: &mut R,
) {
    if rng.random::<f64>() > probability {
        return;
    }
    let bits = bit_width(individual.max_value());
    let mut value = individual.value().max(0) as u64;
    for bit in 0..bits {
        if rng.random::<f64>() < per_bit {
            value ^= 1 << bit;
        }
    }
    individual.set_value(value as i64);
}

/// Snaps the value to `min_value` or `max_value` with equal probability.
pub fn boundary_mutation<R: Rng>(individual: &mut Individual, probability: f64, rng: &mut R) {
    if rng.random::<f64>() > probability {
        return;
    }
    let (min_value, max_value) = individual.bounds();
    let target = if rng.random_bool(0.5) { min_value } else { max_value };
    individual.set_value(target);
}

/// Adds a normally distributed perturbation (mean 0, `sigma` defaulting to
/// 5% of the value span, floored at 1).
///
/// A delta that rounds to 0 is redrawn a bounded number of times so the
/// mutation has some effect once the gate passes.
pub fn gaussian_mutation<R: Rng>(
    individual: &mut Individual,
    probability: f64,
    sigma: Option<f64>,
    rng: &mut R,
) {
    if rng.random::<f64>() > probability {
        return;
    }
    let span = individual.span();
    if span == 0 {
        return;
    }
    let sigma = sigma
        .filter(|s| *s > 0.0)
        .unwrap_or_else(|| (span as f64 * 0.05).max(1.0));
    let normal = Normal::new(0.0, sigma).expect("sigma is positive and finite");

    for _ in 0..GAUSSIAN_RETRIES {
        let change = rng.sample(normal).round() as i64;
        if change != 0 {
            individual.set_value(individual.value() + change);
            return;
        }
    }
}

/// Mutation whose strength adapts to fitness and generation.
///
/// Low fitness raises both the gate probability and the offset range; the
/// generation number adds a capped nudge so late plateaus keep moving. The
/// computed parameters are handed to [`random_mutation`]. An unevaluated
/// individual mutates at full strength.
pub fn adaptive_mutation<R: Rng>(individual: &mut Individual, generation: usize, rng: &mut R) {
    let fitness = individual.fitness().unwrap_or(0.0);
    let (probability, range) = adaptive_parameters(fitness, generation, individual.span());
    random_mutation(individual, range, probability, rng);
}

/// The (probability, range) pair used by [`adaptive_mutation`].
///
/// Probability: `min(0.9, 0.1 + 0.4·(1 − ratio) + min(0.3, generation/1000))`
/// where `ratio = fitness / 100`. Range: `max(1, span · 0.05 · (1 + 3·(1 − ratio²)))`.
/// Non-increasing in fitness, non-decreasing in generation.
pub fn adaptive_parameters(fitness: f64, generation: usize, span: i64) -> (f64, i64) {
    let fitness_ratio = (fitness / 100.0).clamp(0.0, 1.0);

    let base_probability = 0.1 + (1.0 - fitness_ratio) * 0.4;
    let generation_factor = (generation as f64 / 1000.0).min(0.3);
    let probability = (base_probability + generation_factor).min(0.9);

    let mutation_factor = 1.0 - fitness_ratio * fitness_ratio;
    let range = ((span as f64 * 0.05 * (1.0 + 3.0 * mutation_factor)) as i64).max(1);

    (probability, range)
}
