//! Population lifecycle.
//!
//! [`Population`] owns one generation of individuals and advances it:
//! evaluate → elite carry-over → reproduce (select, crossover, mutate) →
//! replace. The population size is invariant across generations, and every
//! offspring is a fresh individual — generations never share instances.

use crate::config::EvoConfig;
use crate::fitness;
use crate::individual::Individual;
use crate::selection::elitism_selection;
use rand::Rng;
use std::collections::HashSet;

/// Statistics for one completed generation.
///
/// Emitted after every evaluation for the reporting/statistics collaborators;
/// the engine itself never reads these back.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationRecord {
    /// Generation index (the initial population is generation 0).
    pub generation: usize,

    /// Highest fitness in the generation.
    pub best_fitness: f64,

    /// Guess held by the fittest individual.
    pub best_value: i64,

    /// Mean fitness across the generation.
    pub avg_fitness: f64,

    /// Sample standard deviation of fitness (0 for a single individual).
    pub fitness_std_dev: f64,

    /// Count of distinct guess values — a cheap diversity measure.
    pub unique_values: usize,
}

/// One generation of candidate guesses and the machinery to breed the next.
pub struct Population {
    individuals: Vec<Individual>,
    generation: usize,
    target: i64,
    previous_best: Option<i64>,
    best: Option<Individual>,
    best_ever_fitness: f64,
    stagnation: usize,
    mutation_range: i64,
    config: EvoConfig,
}

impl Population {
    /// Creates a random initial population.
    ///
    /// The configuration is sanitized here, once; the target is assumed to
    /// lie within the configured bounds (the input layer's contract) and is
    /// clamped as a last resort.
    pub fn new<R: Rng>(target: i64, config: &EvoConfig, rng: &mut R) -> Self {
        let config = config.sanitized();
        let target = target.min(config.max_value).max(config.min_value);
        let individuals = (0..config.population_size)
            .map(|_| Individual::random(config.min_value, config.max_value, rng))
            .collect();

        Self {
            individuals,
            generation: 0,
            target,
            previous_best: None,
            best: None,
            best_ever_fitness: f64::NEG_INFINITY,
            stagnation: 0,
            mutation_range: config.effective_mutation_range(),
            config,
        }
    }

    /// Scores every individual with the configured fitness method and sorts
    /// the population best-first.
    ///
    /// The previous generation's best guess feeds the hot/cold method; other
    /// methods ignore it. Also updates the stagnation counter used for
    /// convergence detection.
    pub fn evaluate(&mut self) {
        fitness::evaluate_population(
            &mut self.individuals,
            self.target,
            self.config.fitness,
            self.previous_best,
        );
        self.individuals.sort_by(|a, b| {
            fitness_of(b)
                .partial_cmp(&fitness_of(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let best = self.individuals[0].clone();
        if fitness_of(&best) > self.best_ever_fitness {
            self.best_ever_fitness = fitness_of(&best);
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }
        self.previous_best = Some(best.value());
        self.best = Some(best);
    }

    /// Breeds the next generation, replacing the current one.
    ///
    /// Elites are cloned through unchanged; the remainder is filled by
    /// selecting parent pairs, recombining them with probability
    /// `crossover_rate` (copying them through otherwise) and mutating each
    /// offspring with probability `mutation_rate`. The replacement always
    /// has exactly the configured population size.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) {
        if self.config.restart_on_convergence && self.converged() {
            self.restart_non_elites(rng);
        }

        let size = self.config.population_size;
        let mut next = elitism_selection(&self.individuals, self.config.elitism_count);

        while next.len() < size {
            let p1 = self.config.selection.select(&self.individuals, rng);
            let mut p2 = self.config.selection.select(&self.individuals, rng);
            // Re-draw the partner a few times when both hold the same guess.
            let mut attempts = 0;
            while self.individuals[p1].value() == self.individuals[p2].value() && attempts < 5 {
                p2 = self.config.selection.select(&self.individuals, rng);
                attempts += 1;
            }

            let (mut child1, mut child2) = if rng.random::<f64>() < self.config.crossover_rate {
                self.config
                    .crossover
                    .recombine(&self.individuals[p1], &self.individuals[p2], rng)
            } else {
                (self.individuals[p1].clone(), self.individuals[p2].clone())
            };

            for child in [&mut child1, &mut child2] {
                self.config.mutation.apply(
                    child,
                    self.config.mutation_rate,
                    self.mutation_range,
                    self.generation,
                    rng,
                );
            }

            next.push(child1);
            if next.len() < size {
                next.push(child2);
            }
        }

        self.individuals = next;
        self.generation += 1;
    }

    /// Whether the best fitness has stalled for at least
    /// `convergence_threshold` evaluations.
    pub fn converged(&self) -> bool {
        self.stagnation >= self.config.convergence_threshold
    }

    /// Replaces every non-elite individual with a fresh random one and
    /// resets the stagnation counter.
    ///
    /// Expects the population sorted best-first (as [`evaluate`] leaves it)
    /// so the preserved prefix really is the elite.
    ///
    /// [`evaluate`]: Self::evaluate
    pub fn restart_non_elites<R: Rng>(&mut self, rng: &mut R) {
        let keep = self.config.elitism_count.min(self.individuals.len());
        for ind in self.individuals.iter_mut().skip(keep) {
            *ind = Individual::random(self.config.min_value, self.config.max_value, rng);
        }
        self.stagnation = 0;
    }

    /// Whether the current best individual holds the target.
    pub fn solved(&self) -> bool {
        self.best().is_some_and(|best| best.value() == self.target)
    }

    /// The fittest individual of the last evaluation, if any.
    pub fn best(&self) -> Option<&Individual> {
        self.best.as_ref()
    }

    /// Statistics for the current generation.
    pub fn record(&self) -> GenerationRecord {
        let n = self.individuals.len();
        let fitnesses: Vec<f64> = self.individuals.iter().map(fitness_of).collect();
        let avg_fitness = fitnesses.iter().sum::<f64>() / n as f64;
        let fitness_std_dev = if n > 1 {
            let variance = fitnesses
                .iter()
                .map(|f| (f - avg_fitness).powi(2))
                .sum::<f64>()
                / (n - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };
        let unique_values = self
            .individuals
            .iter()
            .map(Individual::value)
            .collect::<HashSet<_>>()
            .len();

        let (best_fitness, best_value) = match self.best() {
            Some(best) => (fitness_of(best), best.value()),
            None => (0.0, self.individuals[0].value()),
        };

        GenerationRecord {
            generation: self.generation,
            best_fitness,
            best_value,
            avg_fitness,
            fitness_std_dev,
            unique_values,
        }
    }

    /// Current generation index (0 before the first [`advance`]).
    ///
    /// [`advance`]: Self::advance
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The hidden target value.
    pub fn target(&self) -> i64 {
        self.target
    }

    /// The individuals of the current generation.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Number of individuals; constant across generations.
    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    /// The sanitized configuration driving this population.
    pub fn config(&self) -> &EvoConfig {
        &self.config
    }
}

fn fitness_of(ind: &Individual) -> f64 {
    ind.fitness().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::FitnessMethod;
    use crate::mutation::MutationMethod;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn seeded() -> Pcg64Mcg {
        Pcg64Mcg::seed_from_u64(42)
    }

    #[test]
    fn test_initial_population() {
        let mut rng = seeded();
        let pop = Population::new(50, &EvoConfig::default(), &mut rng);
        assert_eq!(pop.size(), 20);
        assert_eq!(pop.generation(), 0);
        assert!(pop.best().is_none());
        assert!(pop
            .individuals()
            .iter()
            .all(|ind| (1..=100).contains(&ind.value())));
    }

    #[test]
    fn test_target_clamped_into_bounds() {
        let mut rng = seeded();
        let pop = Population::new(5000, &EvoConfig::default(), &mut rng);
        assert_eq!(pop.target(), 100);
    }

    #[test]
    fn test_evaluate_scores_and_sorts() {
        let mut rng = seeded();
        let mut pop = Population::new(50, &EvoConfig::default(), &mut rng);
        pop.evaluate();

        let fitnesses: Vec<f64> = pop
            .individuals()
            .iter()
            .map(|ind| ind.fitness().expect("evaluated"))
            .collect();
        assert!(fitnesses.windows(2).all(|w| w[0] >= w[1]), "not sorted best-first");
        assert_eq!(pop.best().unwrap().fitness(), Some(fitnesses[0]));
    }

    #[test]
    fn test_size_invariant_across_generations() {
        let mut rng = seeded();
        let mut pop = Population::new(50, &EvoConfig::default(), &mut rng);
        for generation in 1..=25 {
            pop.evaluate();
            pop.advance(&mut rng);
            assert_eq!(pop.size(), 20, "size drifted at generation {generation}");
            assert_eq!(pop.generation(), generation);
        }
    }

    #[test]
    fn test_offspring_stay_in_bounds() {
        let mut rng = seeded();
        let config = EvoConfig::default().with_bounds(10, 30);
        let mut pop = Population::new(20, &config, &mut rng);
        for _ in 0..10 {
            pop.evaluate();
            pop.advance(&mut rng);
            assert!(pop
                .individuals()
                .iter()
                .all(|ind| (10..=30).contains(&ind.value())));
        }
    }

    #[test]
    fn test_elitism_keeps_best_fitness_monotone() {
        let mut rng = seeded();
        let mut pop = Population::new(73, &EvoConfig::default(), &mut rng);
        let mut last_best = f64::NEG_INFINITY;
        for _ in 0..50 {
            pop.evaluate();
            let best = pop.best().unwrap().fitness().unwrap();
            assert!(
                best >= last_best,
                "elitism must not lose the best: {best} < {last_best}"
            );
            last_best = best;
            if pop.solved() {
                break;
            }
            pop.advance(&mut rng);
        }
    }

    #[test]
    fn test_record_statistics() {
        let mut rng = seeded();
        let mut pop = Population::new(50, &EvoConfig::default(), &mut rng);
        pop.evaluate();
        let record = pop.record();

        assert_eq!(record.generation, 0);
        assert!((0.0..=100.0).contains(&record.best_fitness));
        assert!(record.avg_fitness <= record.best_fitness);
        assert!(record.fitness_std_dev >= 0.0);
        assert!((1..=20).contains(&record.unique_values));
        assert_eq!(record.best_value, pop.best().unwrap().value());
    }

    #[test]
    fn test_hot_cold_uses_previous_best() {
        let mut rng = seeded();
        let config = EvoConfig::default().with_fitness(FitnessMethod::HotCold);
        let mut pop = Population::new(50, &config, &mut rng);

        // First evaluation has no history; the second sees the previous best.
        pop.evaluate();
        let first_best = pop.best().unwrap().value();
        pop.advance(&mut rng);
        pop.evaluate();

        // The engine survives the directional scoring and stays in range.
        assert!((1..=100).contains(&pop.best().unwrap().value()));
        assert!((1..=100).contains(&first_best));
    }

    #[test]
    fn test_convergence_counter() {
        let mut rng = seeded();
        // Freeze evolution: no crossover, no mutation, so fitness stalls.
        let config = EvoConfig::default()
            .with_crossover_rate(0.0)
            .with_mutation_rate(0.0)
            .with_mutation(MutationMethod::Random)
            .with_convergence_threshold(3);
        let mut pop = Population::new(50, &config, &mut rng);

        pop.evaluate();
        assert!(!pop.converged());
        for _ in 0..3 {
            pop.advance(&mut rng);
            pop.evaluate();
        }
        assert!(pop.converged(), "a frozen population must converge");
    }

    #[test]
    fn test_restart_preserves_elites_and_size() {
        let mut rng = seeded();
        let mut pop = Population::new(50, &EvoConfig::default(), &mut rng);
        pop.evaluate();
        let best_before = pop.best().unwrap().clone();

        pop.restart_non_elites(&mut rng);
        assert_eq!(pop.size(), 20);
        // The sorted prefix survives the restart untouched.
        assert_eq!(pop.individuals()[0].value(), best_before.value());
        assert!(!pop.converged());
    }

    #[test]
    fn test_single_value_range_solves_immediately() {
        let mut rng = seeded();
        let config = EvoConfig::default().with_bounds(5, 5);
        let mut pop = Population::new(5, &config, &mut rng);
        pop.evaluate();
        assert!(pop.solved());
        assert_eq!(pop.best().unwrap().fitness(), Some(100.0));
        assert_eq!(pop.generation(), 0);
    }
}
