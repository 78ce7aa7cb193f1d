//! Fitness scoring.
//!
//! Pure functions mapping a guess to a score in `[0, 100]`, plus batch
//! evaluation over a population. All methods share two contracts:
//!
//! - `guess == target` scores exactly `100.0`
//! - for fixed bounds, the score is non-increasing as `|target - guess|` grows
//!
//! The methods differ in how sharply they separate near hits, which changes
//! the selection pressure the rest of the engine sees.

use crate::individual::Individual;

/// Fitness scoring method.
///
/// # Examples
///
/// ```
/// use evoguess::FitnessMethod;
///
/// let method = FitnessMethod::Linear;
/// assert_eq!(method.score(50, 50, 1, 100, None), 100.0);
/// assert!(method.score(49, 50, 1, 100, None) > method.score(40, 50, 1, 100, None));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FitnessMethod {
    /// Score proportional to `range_size - distance`. The baseline method.
    #[default]
    Linear,

    /// Normalized `1 / (distance + 1)`: close guesses separate much more
    /// sharply than under [`Linear`](Self::Linear). Scores for misses live
    /// in `[0.5, 99.5]`.
    Inverse,

    /// `100 · e^(−6·distance/range_size)`: heavily rewards near hits,
    /// near-zero beyond a small neighborhood of the target.
    Exponential,

    /// Weighted blend `0.6·linear + 0.4·exponential`.
    Combined,

    /// Linear base plus a directional bonus/penalty when a previous guess
    /// is available: +10 for moving closer, −5 for moving away.
    HotCold,
}

impl FitnessMethod {
    /// Looks up a method by its configuration name.
    ///
    /// Unknown names fall back to the default (`linear`).
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "linear" => Self::Linear,
            "inverse" => Self::Inverse,
            "exponential" => Self::Exponential,
            "combined" => Self::Combined,
            "hot_cold" => Self::HotCold,
            _ => Self::default(),
        }
    }

    /// The configuration name of this method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Inverse => "inverse",
            Self::Exponential => "exponential",
            Self::Combined => "combined",
            Self::HotCold => "hot_cold",
        }
    }

    /// Scores one guess. `previous_guess` only influences
    /// [`HotCold`](Self::HotCold).
    pub fn score(
        &self,
        guess: i64,
        target: i64,
        min_value: i64,
        max_value: i64,
        previous_guess: Option<i64>,
    ) -> f64 {
        match self {
            Self::Linear => linear(guess, target, min_value, max_value),
            Self::Inverse => inverse(guess, target, min_value, max_value),
            Self::Exponential => exponential(guess, target, min_value, max_value),
            Self::Combined => combined(guess, target, min_value, max_value),
            Self::HotCold => hot_cold(guess, target, min_value, max_value, previous_guess),
        }
    }
}

/// Linear distance score: `100 · max(0, range_size − distance) / range_size`.
///
/// An exact match scores 100; a distance of `range_size` or more scores 0.
pub fn linear(guess: i64, target: i64, min_value: i64, max_value: i64) -> f64 {
    let distance = (target - guess).abs();
    if distance == 0 {
        return 100.0;
    }
    let range_size = max_value - min_value + 1;
    if range_size <= 0 {
        // Degenerate single-value range: only the target itself exists.
        return 100.0;
    }
    100.0 * ((range_size - distance).max(0) as f64) / range_size as f64
}

/// Inverse distance score: `1 / (distance + 1)` normalized onto `[0.5, 99.5]`.
///
/// The curve is steep near the target, so near hits separate far more
/// sharply than under [`linear`]. The maximum distance scores 0.5, never 0.
pub fn inverse(guess: i64, target: i64, min_value: i64, max_value: i64) -> f64 {
    let distance = (target - guess).abs();
    if distance == 0 {
        return 100.0;
    }
    let range_size = max_value - min_value + 1;
    let max_distance = (range_size - 1).max(1);
    if max_distance == 1 {
        // Two-value range: distance 1 is the nearest possible miss.
        return 99.5;
    }
    let inv = 1.0 / (distance as f64 + 1.0);
    let inv_max = 0.5; // distance 1
    let inv_min = 1.0 / (max_distance as f64 + 1.0);
    (0.5 + (inv - inv_min) / (inv_max - inv_min) * 99.0).clamp(0.5, 99.5)
}

/// Exponential decay score: `100 · e^(−6·distance/range_size)`.
pub fn exponential(guess: i64, target: i64, min_value: i64, max_value: i64) -> f64 {
    let distance = (target - guess).abs();
    if distance == 0 {
        return 100.0;
    }
    let range_size = (max_value - min_value + 1).max(1);
    100.0 * (-6.0 * distance as f64 / range_size as f64).exp()
}

/// Weighted blend: `0.6·linear + 0.4·exponential`.
pub fn combined(guess: i64, target: i64, min_value: i64, max_value: i64) -> f64 {
    0.6 * linear(guess, target, min_value, max_value)
        + 0.4 * exponential(guess, target, min_value, max_value)
}

/// Linear base (scaled to `[0, 90]`) plus directional guidance.
///
/// When `previous_guess` is supplied, moving closer to the target earns a
/// +10 bonus and moving away a −5 penalty. The result is clamped to
/// `[0, 100]`; an exact match always scores exactly 100.
pub fn hot_cold(
    guess: i64,
    target: i64,
    min_value: i64,
    max_value: i64,
    previous_guess: Option<i64>,
) -> f64 {
    let distance = (target - guess).abs();
    if distance == 0 {
        return 100.0;
    }
    let range_size = (max_value - min_value + 1).max(1);
    let base = ((range_size - distance).max(0) as f64) / range_size as f64 * 90.0;

    let direction = match previous_guess {
        Some(prev) => {
            let prev_distance = (target - prev).abs();
            if distance < prev_distance {
                10.0
            } else if distance > prev_distance {
                -5.0
            } else {
                0.0
            }
        }
        None => 0.0,
    };

    (base + direction).clamp(0.0, 100.0)
}

/// Scores every individual in place, overwriting any previous fitness.
///
/// `previous_best` is the best guess of the previous generation; it is only
/// consulted when `method` is [`FitnessMethod::HotCold`].
pub fn evaluate_population(
    individuals: &mut [Individual],
    target: i64,
    method: FitnessMethod,
    previous_best: Option<i64>,
) {
    let previous = if method == FitnessMethod::HotCold {
        previous_best
    } else {
        None
    };
    for ind in individuals.iter_mut() {
        let (min_value, max_value) = ind.bounds();
        let score = method.score(ind.value(), target, min_value, max_value, previous);
        ind.set_fitness(score);
    }
}
