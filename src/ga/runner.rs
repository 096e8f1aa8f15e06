//! Generational GA driver.
//!
//! Each generation runs: evaluate → record stats → track best-ever →
//! adapt mutation rate → check termination → breed the next population
//! (elites copied unchanged, the rest from tournament parents via
//! single-point crossover and per-gene mutation).
//!
//! # Termination
//!
//! | State | Condition (checked after each completed generation) |
//! |-------|-----------|
//! | `MaxGenerationsReached` | ≥ `max_generations` completed, whatever the improvement |
//! | `Converged` | ≥ `min_generations` and average improved < `improvement_threshold` |
//! | `Running` | otherwise |
//!
//! Rows are checked top to bottom.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::chromosome::{mutate_genes, single_point_crossover};
use super::operators::MutationState;
use super::population::{EvaluatedPopulation, GenerationStats, Population};
use super::{FitnessEvaluator, ScheduleChromosome};
use crate::error::ConfigError;
use crate::models::{Catalog, Schedule};

/// Configuration for a GA run.
///
/// # Defaults
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 500);
/// assert_eq!(config.tournament_k, 5);
/// assert_eq!(config.min_generations, 100);
/// assert_eq!(config.max_generations, 1000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_generations(50, 400)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    /// Number of chromosomes per generation.
    pub population_size: usize,
    /// Contestants per tournament.
    pub tournament_k: usize,
    /// Per-gene mutation probability at generation 0.
    pub initial_mutation_rate: f64,
    /// Generations that always run before convergence is considered.
    pub min_generations: usize,
    /// Hard cap on generations.
    pub max_generations: usize,
    /// Relative average-fitness improvement below which the run converges.
    pub improvement_threshold: f64,
    /// Relative improvement below which the mutation rate halves.
    pub mutation_halving_threshold: f64,
    /// Lowest mutation rate reachable by halving.
    pub mutation_rate_floor: f64,
    /// Fraction of each generation copied forward unchanged.
    ///
    /// At least one elite is kept whenever the ratio is positive.
    pub elite_ratio: f64,
    /// Whether to score chromosomes on the rayon pool.
    pub parallel: bool,
    /// Random seed. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            tournament_k: 5,
            initial_mutation_rate: 0.01,
            min_generations: 100,
            max_generations: 1000,
            improvement_threshold: 0.01,
            mutation_halving_threshold: 0.02,
            mutation_rate_floor: 0.0001,
            elite_ratio: 0.1,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_tournament_k(mut self, k: usize) -> Self {
        self.tournament_k = k;
        self
    }

    /// Sets the initial mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.initial_mutation_rate = rate;
        self
    }

    /// Sets the minimum and maximum generation counts.
    pub fn with_generations(mut self, min: usize, max: usize) -> Self {
        self.min_generations = min;
        self.max_generations = max;
        self
    }

    pub fn with_improvement_threshold(mut self, threshold: f64) -> Self {
        self.improvement_threshold = threshold;
        self
    }

    /// Sets the halving threshold and floor of the adaptive mutation rate.
    pub fn with_mutation_adaptation(mut self, halving_threshold: f64, floor: f64) -> Self {
        self.mutation_halving_threshold = halving_threshold;
        self.mutation_rate_floor = floor;
        self
    }

    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of elites carried into each generation.
    pub fn elite_count(&self) -> usize {
        if self.elite_ratio <= 0.0 {
            return 0;
        }
        ((self.population_size as f64 * self.elite_ratio) as usize).max(1)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.tournament_k == 0 {
            return Err(ConfigError::parameter("tournament_k", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.initial_mutation_rate) {
            return Err(ConfigError::parameter(
                "initial_mutation_rate",
                format!("must be in [0, 1] (got {})", self.initial_mutation_rate),
            ));
        }
        if !(0.0..=self.initial_mutation_rate).contains(&self.mutation_rate_floor) {
            return Err(ConfigError::parameter(
                "mutation_rate_floor",
                format!(
                    "must be in [0, initial_mutation_rate] (got {})",
                    self.mutation_rate_floor
                ),
            ));
        }
        if self.max_generations == 0 {
            return Err(ConfigError::parameter("max_generations", "must be at least 1"));
        }
        if self.min_generations > self.max_generations {
            return Err(ConfigError::parameter(
                "min_generations",
                format!(
                    "must not exceed max_generations ({} > {})",
                    self.min_generations, self.max_generations
                ),
            ));
        }
        if !self.improvement_threshold.is_finite() {
            return Err(ConfigError::parameter("improvement_threshold", "must be finite"));
        }
        if !self.mutation_halving_threshold.is_finite() {
            return Err(ConfigError::parameter(
                "mutation_halving_threshold",
                "must be finite",
            ));
        }
        if !(0.0..1.0).contains(&self.elite_ratio) || self.elite_count() >= self.population_size {
            return Err(ConfigError::parameter(
                "elite_ratio",
                "elites must leave room for offspring",
            ));
        }
        Ok(())
    }
}

/// Driver state after a completed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    Running,
    /// Average fitness stopped improving after the minimum generations.
    Converged,
    /// The generation cap was hit.
    MaxGenerationsReached,
}

impl Termination {
    /// State after `completed` generations.
    ///
    /// `improvement` is the relative change in average fitness over the
    /// previous generation, `None` when there is no previous generation.
    pub fn next(completed: usize, improvement: Option<f64>, config: &GaConfig) -> Self {
        let stalled = improvement.is_some_and(|i| i < config.improvement_threshold);
        if completed >= config.max_generations {
            Termination::MaxGenerationsReached
        } else if completed >= config.min_generations && stalled {
            Termination::Converged
        } else {
            Termination::Running
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Termination::Running
    }
}

/// Outcome of a GA run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaResult {
    /// Best chromosome seen in any generation.
    pub best: ScheduleChromosome,
    pub best_fitness: f64,
    /// One entry per completed generation.
    pub trace: Vec<GenerationStats>,
    /// Why the run stopped.
    pub termination: Termination,
    /// Completed generations.
    pub generations: usize,
    /// Mutation rate in effect at the end of the run.
    pub final_mutation_rate: f64,
}

impl GaResult {
    /// Decodes the best chromosome for report writers.
    pub fn schedule(&self, catalog: &Catalog) -> Schedule {
        self.best.decode(catalog)
    }
}

/// Runs the GA with an RNG seeded from `config.seed`.
///
/// # Errors
/// Returns a [`ConfigError`] if the configuration or catalog is invalid.
/// Nothing is evaluated in that case.
///
/// # Example
/// ```no_run
/// use u_timetable::ga::{run_ga, GaConfig};
/// use u_timetable::models::reference_catalog;
///
/// let catalog = reference_catalog();
/// let result = run_ga(&catalog, &GaConfig::default().with_seed(42)).unwrap();
/// for entry in result.schedule(&catalog).entries {
///     println!("{} {} {} {}", entry.time_slot, entry.activity_id, entry.room_id, entry.facilitator_id);
/// }
/// ```
pub fn run_ga(catalog: &Catalog, config: &GaConfig) -> Result<GaResult, ConfigError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    run_ga_with_rng(catalog, config, &mut rng)
}

/// Runs the GA drawing all randomness from `rng`.
///
/// # Errors
/// Same as [`run_ga`].
pub fn run_ga_with_rng<R: Rng>(
    catalog: &Catalog,
    config: &GaConfig,
    rng: &mut R,
) -> Result<GaResult, ConfigError> {
    config.validate()?;
    let evaluator = FitnessEvaluator::new(catalog)?;
    let elite_count = config.elite_count();

    info!(
        "GA start: {} activities, {} rooms, {} slots, {} facilitators, population {}",
        catalog.activity_count(),
        catalog.room_count(),
        catalog.time_slot_count(),
        catalog.facilitator_count(),
        config.population_size
    );

    let mut mutation = MutationState::new(
        config.initial_mutation_rate,
        config.mutation_rate_floor,
        config.mutation_halving_threshold,
    );
    let mut population = Population::random(catalog, config.population_size, rng);
    let mut trace = Vec::new();
    // Replaced by the first generation's best, since validation
    // guarantees a non-empty population.
    let mut best = ScheduleChromosome::from_genes(Vec::new());
    let mut best_fitness = f64::NEG_INFINITY;
    let mut generation = 0;

    let termination = loop {
        let evaluated = population.evaluate(&evaluator, config.parallel);
        let stats = evaluated.stats(generation);
        trace.push(stats);

        if let Some((candidate, fitness)) = evaluated.best() {
            if fitness > best_fitness {
                best = candidate.clone();
                best_fitness = fitness;
            }
        }

        let improvement = mutation.observe(stats.average);
        debug!(
            "gen {:4} | best {:8.3} | avg {:8.3} | worst {:8.3} | improvement {:?} | rate {:.6}",
            generation,
            stats.best,
            stats.average,
            stats.worst,
            improvement,
            mutation.rate()
        );
        if mutation.adapt(improvement) {
            debug!("mutation rate halved to {:.6}", mutation.rate());
        }

        generation += 1;
        let state = Termination::next(generation, improvement, config);
        if state.is_terminal() {
            break state;
        }

        population = next_generation(&evaluated, catalog, config, elite_count, mutation.rate(), rng);
    };

    info!(
        "GA finished: {:?} after {} generations, best fitness {:.4}",
        termination, generation, best_fitness
    );

    Ok(GaResult {
        best,
        best_fitness,
        trace,
        termination,
        generations: generation,
        final_mutation_rate: mutation.rate(),
    })
}

/// Breeds the next population from a scored one.
fn next_generation<R: Rng>(
    evaluated: &EvaluatedPopulation,
    catalog: &Catalog,
    config: &GaConfig,
    elite_count: usize,
    mutation_rate: f64,
    rng: &mut R,
) -> Population {
    let size = config.population_size;
    let mut next = evaluated.elites(elite_count);
    next.reserve(size.saturating_sub(next.len()));

    while next.len() < size {
        let p1 = evaluated.select_parent(config.tournament_k, rng);
        let p2 = evaluated.select_parent(config.tournament_k, rng);
        let (mut c1, mut c2) = single_point_crossover(p1, p2, rng);
        mutate_genes(&mut c1, catalog, mutation_rate, rng);
        mutate_genes(&mut c2, catalog, mutation_rate, rng);

        next.push(c1);
        if next.len() < size {
            next.push(c2);
        }
    }
    Population::from_individuals(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reference_catalog;
    use rand::rngs::SmallRng;

    fn quick_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(40)
            .with_generations(5, 30)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 500);
        assert_eq!(config.tournament_k, 5);
        assert!((config.initial_mutation_rate - 0.01).abs() < 1e-12);
        assert_eq!(config.min_generations, 100);
        assert_eq!(config.max_generations, 1000);
        assert!((config.improvement_threshold - 0.01).abs() < 1e-12);
        assert!((config.mutation_halving_threshold - 0.02).abs() < 1e-12);
        assert!((config.mutation_rate_floor - 0.0001).abs() < 1e-12);
        assert_eq!(config.elite_count(), 50);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_elite_count_at_least_one() {
        assert_eq!(GaConfig::default().with_population_size(5).elite_count(), 1);
        assert_eq!(
            GaConfig::default().with_population_size(5).with_elite_ratio(0.0).elite_count(),
            0
        );
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert_eq!(config.validate(), Err(ConfigError::PopulationTooSmall(1)));
    }

    #[test]
    fn test_validate_parameters() {
        let bad = [
            GaConfig::default().with_tournament_k(0),
            GaConfig::default().with_mutation_rate(1.5),
            GaConfig::default().with_mutation_adaptation(0.02, 0.05),
            GaConfig::default().with_generations(10, 0),
            GaConfig::default().with_generations(200, 100),
            GaConfig::default().with_improvement_threshold(f64::NAN),
            GaConfig::default().with_elite_ratio(1.0),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidParameter { .. })),
                "{config:?}"
            );
        }
    }

    #[test]
    fn test_termination_floor() {
        let config = GaConfig::default();
        assert_eq!(Termination::next(1, None, &config), Termination::Running);
        assert_eq!(Termination::next(99, Some(0.0), &config), Termination::Running);
        assert_eq!(Termination::next(100, Some(0.0), &config), Termination::Converged);
        assert_eq!(Termination::next(100, Some(-0.3), &config), Termination::Converged);
        assert_eq!(Termination::next(100, Some(0.05), &config), Termination::Running);
    }

    #[test]
    fn test_termination_cap() {
        let config = GaConfig::default();
        assert_eq!(
            Termination::next(1000, Some(0.5), &config),
            Termination::MaxGenerationsReached
        );
        assert_eq!(
            Termination::next(1000, None, &config),
            Termination::MaxGenerationsReached
        );
        assert_eq!(
            Termination::next(1000, Some(0.0), &config),
            Termination::MaxGenerationsReached
        );
        assert_eq!(
            Termination::next(1000, Some(-0.2), &config),
            Termination::MaxGenerationsReached
        );
        assert!(Termination::MaxGenerationsReached.is_terminal());
        assert!(!Termination::Running.is_terminal());
    }

    #[test]
    fn test_invalid_catalog_fails_before_running() {
        let mut catalog = reference_catalog();
        catalog.rooms.clear();
        let result = run_ga(&catalog, &quick_config());
        assert!(matches!(result, Err(ConfigError::InvalidCatalog(_))));
    }

    #[test]
    fn test_invalid_config_fails_before_running() {
        let catalog = reference_catalog();
        let config = quick_config().with_population_size(1);
        assert_eq!(
            run_ga(&catalog, &config),
            Err(ConfigError::PopulationTooSmall(1))
        );
    }

    #[test]
    fn test_run_quick() {
        let catalog = reference_catalog();
        let config = quick_config();
        let result = run_ga(&catalog, &config).unwrap();

        assert!((5..=30).contains(&result.generations));
        assert_eq!(result.trace.len(), result.generations);
        assert!(result.termination.is_terminal());
        assert!(result.best.is_valid(&catalog));
        for (i, stats) in result.trace.iter().enumerate() {
            assert_eq!(stats.generation, i);
            assert!(stats.worst <= stats.average && stats.average <= stats.best);
        }
    }

    #[test]
    fn test_best_is_best_ever() {
        let catalog = reference_catalog();
        let result = run_ga(&catalog, &quick_config()).unwrap();

        let trace_best = result
            .trace
            .iter()
            .map(|s| s.best)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(result.best_fitness, trace_best);

        let evaluator = FitnessEvaluator::new(&catalog).unwrap();
        assert_eq!(
            evaluator.evaluate(&result.best).to_bits(),
            result.best_fitness.to_bits()
        );
    }

    #[test]
    fn test_best_taken_from_first_generation() {
        let catalog = reference_catalog();
        let config = quick_config().with_generations(1, 1);
        let result = run_ga(&catalog, &config).unwrap();

        assert_eq!(result.generations, 1);
        assert_eq!(result.termination, Termination::MaxGenerationsReached);
        assert!(result.best.is_valid(&catalog));
        assert_eq!(result.best_fitness, result.trace[0].best);
    }

    #[test]
    fn test_elitism_best_never_decreases() {
        let catalog = reference_catalog();
        let config = quick_config().with_generations(30, 30);
        let result = run_ga(&catalog, &config).unwrap();

        assert_eq!(result.generations, 30);
        assert_eq!(result.termination, Termination::MaxGenerationsReached);
        for w in result.trace.windows(2) {
            assert!(w[1].best >= w[0].best, "{:?} -> {:?}", w[0], w[1]);
        }
    }

    #[test]
    fn test_mutation_rate_stays_in_bounds() {
        let catalog = reference_catalog();
        let config = quick_config().with_generations(20, 20);
        let result = run_ga(&catalog, &config).unwrap();

        assert!(result.final_mutation_rate <= config.initial_mutation_rate);
        assert!(result.final_mutation_rate >= config.mutation_rate_floor);
    }

    #[test]
    fn test_default_limits_bound_generations() {
        let catalog = reference_catalog();
        let config = GaConfig::default()
            .with_population_size(20)
            .with_seed(3)
            .with_parallel(false);
        let result = run_ga(&catalog, &config).unwrap();

        assert!((100..=1000).contains(&result.generations));
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let catalog = reference_catalog();
        let a = run_ga(&catalog, &quick_config()).unwrap();
        let b = run_ga(&catalog, &quick_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let catalog = reference_catalog();
        let serial = run_ga(&catalog, &quick_config()).unwrap();
        let parallel = run_ga(&catalog, &quick_config().with_parallel(true)).unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_run_with_injected_rng() {
        let catalog = reference_catalog();
        let mut rng = SmallRng::seed_from_u64(5);
        let result = run_ga_with_rng(&catalog, &quick_config(), &mut rng).unwrap();

        let schedule = result.schedule(&catalog);
        assert_eq!(schedule.len(), catalog.activity_count());
        assert!(schedule.entries.windows(2).all(|w| w[0].hour <= w[1].hour));
    }

    #[test]
    fn test_two_individual_population() {
        let catalog = reference_catalog();
        let config = quick_config().with_population_size(2).with_generations(1, 3);
        let result = run_ga(&catalog, &config).unwrap();
        assert!((1..=3).contains(&result.generations));
    }
}
