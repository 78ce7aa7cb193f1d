//! Parent selection strategies.
//!
//! Selection operates over a fitness-evaluated population and picks which
//! individuals reproduce. All strategies maximize (higher fitness = better);
//! an unevaluated individual counts as fitness 0.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection
//!   Algorithm" (stochastic universal sampling)

use crate::individual::Individual;
use rand::Rng;

/// Selection strategy for choosing a single parent.
///
/// # Examples
///
/// ```
/// use evoguess::Selection;
///
/// // Tournament of size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
///
/// // Fitness-proportionate
/// let sel = Selection::Roulette;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Selection {
    /// Tournament selection: sample `k` individuals without replacement,
    /// return the fittest. `k` is clamped to the population size; ties go
    /// to the first-encountered entrant.
    ///
    /// Higher `k` = stronger selection pressure.
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// When total fitness is zero the choice degrades to uniform-random —
    /// no division by zero.
    Roulette,

    /// Rank-based selection: sort descending by fitness and weight by rank
    /// position (best = `N`, worst = `1`). Reduces domination by outliers
    /// when fitness variance is high.
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Looks up a strategy by its configuration name.
    ///
    /// Unknown names fall back to the default (`tournament`, k = 3).
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "tournament" => Self::Tournament(3),
            "roulette" => Self::Roulette,
            "rank" => Self::Rank,
            _ => Self::default(),
        }
    }

    /// The configuration name of this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tournament(_) => "tournament",
            Self::Roulette => "roulette",
            Self::Rank => "rank",
        }
    }

    /// Selects one parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<R: Rng>(&self, population: &[Individual], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Roulette => roulette(population, rng),
            Selection::Rank => rank(population, rng),
        }
    }
}

fn fitness_of(ind: &Individual) -> f64 {
    ind.fitness().unwrap_or(0.0)
}

/// Tournament selection: sample `k` without replacement, return the fittest.
fn tournament<R: Rng>(population: &[Individual], k: usize, rng: &mut R) -> usize {
    let n = population.len();
    let k = k.clamp(1, n);

    let entrants = rand::seq::index::sample(rng, n, k);
    let mut best_idx = None;
    let mut best_fitness = f64::NEG_INFINITY;
    for idx in entrants {
        let f = fitness_of(&population[idx]);
        // Strict comparison keeps the first-encountered entrant on ties.
        if best_idx.is_none() || f > best_fitness {
            best_idx = Some(idx);
            best_fitness = f;
        }
    }
    best_idx.expect("tournament samples at least one entrant")
}

/// Roulette wheel selection, fitness-proportionate.
fn roulette<R: Rng>(population: &[Individual], rng: &mut R) -> usize {
    let n = population.len();
    let total: f64 = population.iter().map(fitness_of).sum();
    if total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, ind) in population.iter().enumerate() {
        cumulative += fitness_of(ind);
        if cumulative >= threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

/// Rank selection: weight by rank position over a descending sort.
fn rank<R: Rng>(population: &[Individual], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let mut indexed: Vec<usize> = (0..n).collect();
    // Stable sort: equal-fitness individuals keep their original order.
    indexed.sort_by(|&a, &b| {
        fitness_of(&population[b])
            .partial_cmp(&fitness_of(&population[a]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Best rank weighs n, worst weighs 1.
    let total = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (position, &original_idx) in indexed.iter().enumerate() {
        cumulative += (n - position) as f64;
        if cumulative >= threshold {
            return original_idx;
        }
    }

    *indexed.last().expect("population is non-empty")
}

/// Stochastic universal sampling: select `num_selections` indices with a
/// single spin of evenly spaced pointers.
///
/// Expected selection counts are proportional to fitness, with lower
/// variance than repeated [`Selection::Roulette`] draws. A zero-fitness
/// population degrades to uniform-random choices (with replacement).
///
/// # Panics
/// Panics if `population` is empty.
pub fn stochastic_universal_sampling<R: Rng>(
    population: &[Individual],
    num_selections: usize,
    rng: &mut R,
) -> Vec<usize> {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    if num_selections == 0 {
        return Vec::new();
    }

    let n = population.len();
    let total: f64 = population.iter().map(fitness_of).sum();
    if total <= 0.0 {
        return (0..num_selections)
            .map(|_| rng.random_range(0..n))
            .collect();
    }

    let pointer_distance = total / num_selections as f64;
    let start = rng.random_range(0.0..pointer_distance);

    // One pass over the cumulative fitness, collecting one index per pointer.
    let mut selected = Vec::with_capacity(num_selections);
    let mut cumulative = 0.0;
    let mut pointer = 0usize;
    for (i, ind) in population.iter().enumerate() {
        cumulative += fitness_of(ind);
        while pointer < num_selections
            && cumulative >= start + pointer as f64 * pointer_distance
        {
            selected.push(i);
            pointer += 1;
        }
    }
    while selected.len() < num_selections {
        selected.push(n - 1); // floating-point fallback
    }

    selected
}

/// Elitism: the top `n` individuals by fitness, as independent clones.
///
/// Deterministic — ties keep the original population order. The clones carry
/// their fitness so elite carry-over never degrades the best score.
pub fn elitism_selection(population: &[Individual], n: usize) -> Vec<Individual> {
    let mut indexed: Vec<usize> = (0..population.len()).collect();
    indexed.sort_by(|&a, &b| {
        fitness_of(&population[b])
            .partial_cmp(&fitness_of(&population[a]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indexed
        .into_iter()
        .take(n)
        .map(|i| population[i].clone())
        .collect()
}
