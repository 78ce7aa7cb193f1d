//! Engine configuration.
//!
//! [`EvoConfig`] holds every parameter of the evolution loop. Validation
//! never rejects: out-of-range values are clamped to the nearest valid
//! value and unknown method names fall back to documented defaults, so a
//! configuration mapping coming from an untrusted source (user input, a
//! config file collaborator) always yields a usable engine.

use crate::crossover::CrossoverMethod;
use crate::fitness::FitnessMethod;
use crate::mutation::MutationMethod;
use crate::selection::Selection;

/// Hard limits on the guessing range.
const VALUE_FLOOR: i64 = 1;
const VALUE_CEIL: i64 = 1_000_000;

/// Configuration for the evolution engine.
///
/// # Defaults
///
/// ```
/// use evoguess::EvoConfig;
///
/// let config = EvoConfig::default();
/// assert_eq!(config.population_size, 20);
/// assert_eq!(config.max_generations, 1000);
/// assert_eq!((config.min_value, config.max_value), (1, 100));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use evoguess::{EvoConfig, Selection, FitnessMethod};
///
/// let config = EvoConfig::default()
///     .with_bounds(1, 500)
///     .with_population_size(50)
///     .with_selection(Selection::Tournament(5))
///     .with_fitness(FitnessMethod::Combined)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvoConfig {
    /// Smallest guessable value (inclusive).
    pub min_value: i64,

    /// Largest guessable value (inclusive).
    pub max_value: i64,

    /// Number of individuals per generation. Constant for the whole run.
    pub population_size: usize,

    /// Generation budget before the run gives up.
    pub max_generations: usize,

    /// Probability of applying crossover to a selected parent pair (0.0–1.0).
    ///
    /// When crossover is skipped the parents are copied through unchanged.
    pub crossover_rate: f64,

    /// Probability of mutating each offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Maximum offset for random mutation.
    ///
    /// `None` auto-computes 10% of the value span (at least 1).
    pub mutation_range: Option<i64>,

    /// Number of top individuals copied unchanged into the next generation.
    pub elitism_count: usize,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Recombination method.
    pub crossover: CrossoverMethod,

    /// Mutation method.
    pub mutation: MutationMethod,

    /// Fitness scoring method.
    pub fitness: FitnessMethod,

    /// Generations without best-fitness improvement before the population
    /// counts as converged.
    pub convergence_threshold: usize,

    /// Whether to re-randomize every non-elite individual once converged.
    pub restart_on_convergence: bool,

    /// Random seed for reproducible runs. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EvoConfig {
    fn default() -> Self {
        Self {
            min_value: 1,
            max_value: 100,
            population_size: 20,
            max_generations: 1000,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            mutation_range: None,
            elitism_count: 2,
            selection: Selection::default(),
            crossover: CrossoverMethod::default(),
            mutation: MutationMethod::default(),
            fitness: FitnessMethod::default(),
            convergence_threshold: 5,
            restart_on_convergence: false,
            seed: None,
        }
    }
}

impl EvoConfig {
    /// Sets the guessing range.
    pub fn with_bounds(mut self, min_value: i64, max_value: i64) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate, clamped to `[0, 1]`.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate, clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets an explicit random-mutation range (floored at 1).
    pub fn with_mutation_range(mut self, range: i64) -> Self {
        self.mutation_range = Some(range.max(1));
        self
    }

    /// Sets the elite carry-over count.
    pub fn with_elitism_count(mut self, n: usize) -> Self {
        self.elitism_count = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Convenience for `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Sets the crossover method.
    pub fn with_crossover(mut self, crossover: CrossoverMethod) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the mutation method.
    pub fn with_mutation(mut self, mutation: MutationMethod) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the fitness method.
    pub fn with_fitness(mut self, fitness: FitnessMethod) -> Self {
        self.fitness = fitness;
        self
    }

    /// Sets the convergence threshold.
    pub fn with_convergence_threshold(mut self, generations: usize) -> Self {
        self.convergence_threshold = generations;
        self
    }

    /// Enables or disables population restart on convergence.
    pub fn with_restart_on_convergence(mut self, restart: bool) -> Self {
        self.restart_on_convergence = restart;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns a copy with every parameter clamped into its valid range.
    ///
    /// This is the validation step: it runs once when a [`Population`]
    /// is constructed and never fails. Out-of-range values are corrected
    /// silently to the nearest valid value.
    ///
    /// [`Population`]: crate::Population
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();

        config.min_value = config.min_value.clamp(VALUE_FLOOR, VALUE_CEIL);
        config.max_value = config.max_value.clamp(config.min_value, VALUE_CEIL);
        config.population_size = config.population_size.clamp(2, 1000);
        config.max_generations = config.max_generations.clamp(1, 100_000);
        config.crossover_rate = config.crossover_rate.clamp(0.0, 1.0);
        config.mutation_rate = config.mutation_rate.clamp(0.0, 1.0);
        config.mutation_range = config.mutation_range.map(|r| r.max(1));
        config.elitism_count = config.elitism_count.min(config.population_size / 2);
        config.convergence_threshold = config.convergence_threshold.clamp(1, 100);
        if let Selection::Tournament(k) = config.selection {
            config.selection = Selection::Tournament(k.clamp(2, 10));
        }

        config
    }

    /// The random-mutation range: the explicit setting, or 10% of the
    /// value span (at least 1) when unset.
    pub fn effective_mutation_range(&self) -> i64 {
        self.mutation_range
            .unwrap_or_else(|| ((self.max_value - self.min_value) / 10).max(1))
    }
}
