//! Evolution loop execution.
//!
//! [`EvoRunner`] drives a [`Population`] through repeated
//! evaluate → advance steps until the target is guessed or the generation
//! budget runs out, collecting one [`GenerationRecord`] per generation.

use crate::config::EvoConfig;
use crate::population::{GenerationRecord, Population};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::time::{Duration, Instant};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Termination {
    /// An individual guessed the target (fitness 100).
    SolutionFound,

    /// The generation budget was exhausted without a hit. A normal
    /// terminal state, not an error.
    GenerationLimit,
}

/// Result of one evolution run.
///
/// Consumed by the reporting/statistics/visualization collaborators;
/// nothing in here feeds back into the engine.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    /// Best guess found over the whole run.
    pub best_value: i64,

    /// Fitness of the best guess.
    pub best_fitness: f64,

    /// Number of generations bred (0 when the initial population already
    /// contains the target).
    pub generations: usize,

    /// Why the run ended.
    pub termination: Termination,

    /// Wall-clock duration of the run.
    pub elapsed: Duration,

    /// One record per evaluated generation, in order. Always
    /// `generations + 1` entries (the initial population included).
    pub history: Vec<GenerationRecord>,
}

impl RunResult {
    /// Whether the run found the target.
    pub fn solved(&self) -> bool {
        self.termination == Termination::SolutionFound
    }

    /// The first generation whose best fitness reached `threshold`, if any.
    ///
    /// Useful for convergence analysis: how long to 50/90/99.
    pub fn generations_to_reach(&self, threshold: f64) -> Option<usize> {
        self.history
            .iter()
            .find(|record| record.best_fitness >= threshold)
            .map(|record| record.generation)
    }
}

/// Executes the evolution loop.
///
/// # Usage
///
/// ```
/// use evoguess::{EvoConfig, EvoRunner};
///
/// let config = EvoConfig::default().with_seed(42);
/// let result = EvoRunner::run(50, &config);
/// assert!(result.solved());
/// assert_eq!(result.best_value, 50);
/// ```
pub struct EvoRunner;

impl EvoRunner {
    /// Runs the evolution toward `target` with an RNG built from the
    /// configured seed (entropy-seeded when none is set).
    pub fn run(target: i64, config: &EvoConfig) -> RunResult {
        let mut rng = match config.seed {
            Some(seed) => Pcg64Mcg::seed_from_u64(seed),
            None => Pcg64Mcg::seed_from_u64(rand::random()),
        };
        Self::run_with_rng(target, config, &mut rng)
    }

    /// Runs the evolution with a caller-supplied random source.
    pub fn run_with_rng<R: Rng>(target: i64, config: &EvoConfig, rng: &mut R) -> RunResult {
        let start = Instant::now();
        let mut population = Population::new(target, config, rng);
        let max_generations = population.config().max_generations;

        let mut history = Vec::with_capacity(max_generations + 1);
        population.evaluate();
        history.push(population.record());

        let mut best = population
            .best()
            .expect("population was evaluated at least once")
            .clone();

        let mut termination = if population.solved() {
            Termination::SolutionFound
        } else {
            Termination::GenerationLimit
        };

        if termination != Termination::SolutionFound {
            for _ in 0..max_generations {
                population.advance(rng);
                population.evaluate();
                history.push(population.record());

                // Track the best over the whole run, not just the last
                // generation; with elitism disabled they can differ.
                let gen_best = population
                    .best()
                    .expect("population was evaluated this generation");
                if gen_best.fitness().unwrap_or(0.0) > best.fitness().unwrap_or(0.0) {
                    best = gen_best.clone();
                }

                if population.solved() {
                    termination = Termination::SolutionFound;
                    break;
                }
            }
        }

        RunResult {
            best_value: best.value(),
            best_fitness: best.fitness().unwrap_or(0.0),
            generations: population.generation(),
            termination,
            elapsed: start.elapsed(),
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::FitnessMethod;
    use crate::selection::Selection;

    #[test]
    fn test_finds_target_with_seeded_rng() {
        // The reference scenario: target 50 in [1, 100], population 20,
        // elitism 2, tournament selection, linear fitness.
        let config = EvoConfig::default()
            .with_bounds(1, 100)
            .with_population_size(20)
            .with_elitism_count(2)
            .with_selection(Selection::Tournament(3))
            .with_fitness(FitnessMethod::Linear)
            .with_max_generations(1000)
            .with_seed(42);

        let result = EvoRunner::run(50, &config);

        assert!(result.solved(), "expected a hit within 1000 generations");
        assert_eq!(result.best_value, 50);
        assert_eq!(result.best_fitness, 100.0);
        assert!(result.generations <= 1000);
    }

    #[test]
    fn test_all_method_combinations_terminate() {
        for fitness in [
            FitnessMethod::Linear,
            FitnessMethod::Inverse,
            FitnessMethod::Exponential,
            FitnessMethod::Combined,
            FitnessMethod::HotCold,
        ] {
            for selection in [Selection::Tournament(3), Selection::Roulette, Selection::Rank] {
                let config = EvoConfig::default()
                    .with_fitness(fitness)
                    .with_selection(selection)
                    .with_max_generations(300)
                    .with_seed(7);
                let result = EvoRunner::run(42, &config);
                assert_eq!(result.history.len(), result.generations + 1);
                assert!(
                    result.best_fitness > 0.0,
                    "{}/{} made no progress at all",
                    fitness.name(),
                    selection.name()
                );
            }
        }
    }

    #[test]
    fn test_single_value_range_succeeds_at_generation_zero() {
        let config = EvoConfig::default().with_bounds(5, 5).with_seed(1);
        let result = EvoRunner::run(5, &config);

        assert!(result.solved());
        assert_eq!(result.generations, 0);
        assert_eq!(result.best_value, 5);
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.history[0].best_fitness, 100.0);
    }

    #[test]
    fn test_generation_limit_termination() {
        // Two random guesses in a million-wide range, one breeding step:
        // the budget runs out and that is a normal terminal state.
        let config = EvoConfig::default()
            .with_bounds(1, 1_000_000)
            .with_population_size(2)
            .with_elitism_count(1)
            .with_crossover_rate(0.0)
            .with_mutation_rate(0.0)
            .with_max_generations(1)
            .with_seed(7);

        let result = EvoRunner::run(777_777, &config);

        assert_eq!(result.termination, Termination::GenerationLimit);
        assert!(!result.solved());
        assert_eq!(result.generations, 1);
        assert_eq!(result.history.len(), 2);
        assert!(result.best_fitness < 100.0);
    }

    #[test]
    fn test_same_seed_reproduces_run_exactly() {
        let config = EvoConfig::default().with_seed(1234);
        let a = EvoRunner::run(77, &config);
        let b = EvoRunner::run(77, &config);

        assert_eq!(a.generations, b.generations);
        assert_eq!(a.termination, b.termination);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_history_is_append_only_and_ordered() {
        let config = EvoConfig::default().with_max_generations(50).with_seed(3);
        let result = EvoRunner::run(99, &config);

        for (i, record) in result.history.iter().enumerate() {
            assert_eq!(record.generation, i);
        }
        // Elitism keeps the recorded best monotone.
        for window in result.history.windows(2) {
            assert!(window[1].best_fitness >= window[0].best_fitness);
        }
    }

    #[test]
    fn test_generations_to_reach() {
        let config = EvoConfig::default().with_seed(42);
        let result = EvoRunner::run(50, &config);

        let to_50 = result.generations_to_reach(50.0).expect("should reach 50");
        let to_100 = result.generations_to_reach(100.0).expect("solved");
        assert!(to_50 <= to_100);
        assert_eq!(result.generations_to_reach(101.0), None);
    }

    #[test]
    fn test_restart_on_convergence_still_terminates() {
        let config = EvoConfig::default()
            .with_restart_on_convergence(true)
            .with_convergence_threshold(3)
            .with_max_generations(500)
            .with_seed(11);
        let result = EvoRunner::run(83, &config);
        assert_eq!(result.history.len(), result.generations + 1);
        assert!(result.best_fitness > 0.0);
    }

    #[test]
    fn test_elapsed_is_measured() {
        let config = EvoConfig::default().with_seed(5).with_max_generations(10);
        let result = EvoRunner::run(60, &config);
        assert!(result.elapsed >= Duration::ZERO);
    }
}
