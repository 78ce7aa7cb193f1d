//! Recombination operators.
//!
//! Every method takes two parent [`Individual`]s and produces two new
//! children with values clamped into the parents' bounds. Children are
//! always fresh instances with no fitness — crossover never aliases a
//! parent into the next generation.
//!
//! The binary operators work on the fixed-width bit pattern of the value
//! (width = bits needed for `max_value`); bounds are at least 1, so the
//! pattern is always a plain non-negative integer.

use crate::individual::Individual;
use rand::Rng;

/// Crossover method for recombining two parents.
///
/// # Examples
///
/// ```
/// use evoguess::CrossoverMethod;
///
/// assert_eq!(CrossoverMethod::from_name("binary"), CrossoverMethod::Binary);
/// assert_eq!(CrossoverMethod::from_name("unknown"), CrossoverMethod::Adaptive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CrossoverMethod {
    /// Weighted average with a random weight `w ∈ [0, 1]`:
    /// `child1 = w·p1 + (1−w)·p2`, `child2` with the weights swapped.
    Arithmetic,

    /// Children spread around the parents' average, each offset by a random
    /// variation bounded by half the parents' absolute difference.
    Average,

    /// Single-point bit splice of the parents' fixed-width binary patterns.
    Binary,

    /// Two-point bit splice: the middle segment is swapped between parents.
    BinaryTwoPoint,

    /// Picks among the other methods based on how close the parents are:
    /// bit-level search when nearly converged, coarse averaging when far
    /// apart. The default.
    #[default]
    Adaptive,
}

impl CrossoverMethod {
    /// Looks up a method by its configuration name.
    ///
    /// Unknown names fall back to the default (`adaptive`).
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "arithmetic" => Self::Arithmetic,
            "average" => Self::Average,
            "binary" => Self::Binary,
            "binary_two_point" => Self::BinaryTwoPoint,
            "adaptive" => Self::Adaptive,
            _ => Self::default(),
        }
    }

    /// The configuration name of this method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Arithmetic => "arithmetic",
            Self::Average => "average",
            Self::Binary => "binary",
            Self::BinaryTwoPoint => "binary_two_point",
            Self::Adaptive => "adaptive",
        }
    }

    /// Produces two children from two parents.
    pub fn recombine<R: Rng>(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        rng: &mut R,
    ) -> (Individual, Individual) {
        match self {
            Self::Arithmetic => arithmetic_crossover(parent1, parent2, rng),
            Self::Average => average_crossover(parent1, parent2, rng),
            Self::Binary => binary_crossover(parent1, parent2, rng),
            Self::BinaryTwoPoint => binary_two_point_crossover(parent1, parent2, rng),
            Self::Adaptive => {
                adaptive_choice(parent1, parent2).recombine(parent1, parent2, rng)
            }
        }
    }
}

/// Arithmetic crossover: complementary weighted averages, truncated.
pub fn arithmetic_crossover<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    rng: &mut R,
) -> (Individual, Individual) {
    let (min_value, max_value) = parent1.bounds();
    let p1 = parent1.value() as f64;
    let p2 = parent2.value() as f64;

    let weight: f64 = rng.random();
    let child1 = (weight * p1 + (1.0 - weight) * p2) as i64;
    let child2 = ((1.0 - weight) * p1 + weight * p2) as i64;

    (
        Individual::with_value(child1, min_value, max_value),
        Individual::with_value(child2, min_value, max_value),
    )
}

/// Average crossover: both children explore around the parents' midpoint.
///
/// Each child is offset from the average by a random variation bounded by
/// half the parents' absolute difference (at least ±1 when the parents
/// differ). Identical parents get small ±1..3 nudges to create diversity.
pub fn average_crossover<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    rng: &mut R,
) -> (Individual, Individual) {
    let (min_value, max_value) = parent1.bounds();
    let p1 = parent1.value();
    let p2 = parent2.value();

    let average = (p1 + p2) / 2;
    let difference = (p1 - p2).abs();

    let (child1, child2) = if difference == 0 {
        (
            average + rng.random_range(1..=3),
            average - rng.random_range(1..=3),
        )
    } else {
        let spread = (difference / 2).max(1);
        (
            average + rng.random_range(-spread..=spread),
            average + rng.random_range(-spread..=spread),
        )
    };

    (
        Individual::with_value(child1, min_value, max_value),
        Individual::with_value(child2, min_value, max_value),
    )
}

/// Single-point binary crossover over the fixed-width bit patterns.
///
/// A cut point is drawn in `1..width`; each child takes one parent's high
/// bits and the other's low bits. Falls back to cloning when the width is
/// too small to cut.
pub fn binary_crossover<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    rng: &mut R,
) -> (Individual, Individual) {
    let (min_value, max_value) = parent1.bounds();
    let bits = bit_width(max_value);
    if bits < 2 {
        return clone_pair(parent1, parent2);
    }

    let point = rng.random_range(1..bits);
    let (child1, child2) = splice(
        parent1.value().max(0) as u64,
        parent2.value().max(0) as u64,
        bits,
        point,
    );

    (
        Individual::with_value(child1 as i64, min_value, max_value),
        Individual::with_value(child2 as i64, min_value, max_value),
    )
}

/// Two-point binary crossover: the bit segment between the cut points is
/// swapped between the parents. Falls back to cloning when the width is
/// too small for two distinct cuts.
pub fn binary_two_point_crossover<R: Rng>(
    parent1: &Individual,
    parent2: &Individual,
    rng: &mut R,
) -> (Individual, Individual) {
    let (min_value, max_value) = parent1.bounds();
    let bits = bit_width(max_value);
    if bits < 3 {
        return clone_pair(parent1, parent2);
    }

    let point1 = rng.random_range(1..bits - 1);
    let point2 = rng.random_range(point1 + 1..bits);
    let (child1, child2) = splice_two(
        parent1.value().max(0) as u64,
        parent2.value().max(0) as u64,
        bits,
        point1,
        point2,
    );

    (
        Individual::with_value(child1 as i64, min_value, max_value),
        Individual::with_value(child2 as i64, min_value, max_value),
    )
}

/// Picks the crossover method suited to the parents' similarity.
///
/// Distance below 10% of the value range favors fine-grained bit splicing,
/// below 40% the two-point variant, anything wider the coarse average.
pub fn adaptive_choice(parent1: &Individual, parent2: &Individual) -> CrossoverMethod {
    let difference = (parent1.value() - parent2.value()).abs() as f64;
    let range = parent1.span().max(1) as f64;

    if difference < range * 0.10 {
        CrossoverMethod::Binary
    } else if difference < range * 0.40 {
        CrossoverMethod::BinaryTwoPoint
    } else {
        CrossoverMethod::Average
    }
}

/// Bits needed to represent `max_value` (at least 1).
pub(crate) fn bit_width(max_value: i64) -> u32 {
    64 - (max_value.max(1) as u64).leading_zeros()
}

/// Splices two `bits`-wide patterns at `point` (counted from the most
/// significant bit): each child keeps one parent's top `point` bits and the
/// other's remainder.
fn splice(a: u64, b: u64, bits: u32, point: u32) -> (u64, u64) {
    let low_mask = (1u64 << (bits - point)) - 1;
    ((a & !low_mask) | (b & low_mask), (b & !low_mask) | (a & low_mask))
}

/// Two-point splice: swaps the segment `[point1, point2)` (from the most
/// significant bit) between the two patterns.
fn splice_two(a: u64, b: u64, bits: u32, point1: u32, point2: u32) -> (u64, u64) {
    let middle_mask = ((1u64 << (bits - point1)) - 1) & !((1u64 << (bits - point2)) - 1);
    (
        (a & !middle_mask) | (b & middle_mask),
        (b & !middle_mask) | (a & middle_mask),
    )
}

fn clone_pair(parent1: &Individual, parent2: &Individual) -> (Individual, Individual) {
    let (min_value, max_value) = parent1.bounds();
    (
        Individual::with_value(parent1.value(), min_value, max_value),
        Individual::with_value(parent2.value(), min_value, max_value),
    )
}
