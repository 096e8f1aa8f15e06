//! Population and per-generation scoring.
//!
//! A [`Population`] is a plain vector of chromosomes. Evaluating it yields
//! an [`EvaluatedPopulation`], which keeps fitness in a vector parallel to
//! the chromosomes. Scores never live inside a chromosome, so a chromosome
//! that is later mutated cannot carry a stale score.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::operators::tournament_index;
use super::{FitnessEvaluator, ScheduleChromosome};
use crate::models::Catalog;

/// Fitness summary of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub generation: usize,
    pub best: f64,
    pub average: f64,
    pub worst: f64,
}

/// An unscored population.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    individuals: Vec<ScheduleChromosome>,
}

impl Population {
    /// Creates `size` random chromosomes.
    pub fn random<R: Rng>(catalog: &Catalog, size: usize, rng: &mut R) -> Self {
        let individuals = (0..size)
            .map(|_| ScheduleChromosome::random(catalog, rng))
            .collect();
        Self { individuals }
    }

    pub fn from_individuals(individuals: Vec<ScheduleChromosome>) -> Self {
        Self { individuals }
    }

    pub fn individuals(&self) -> &[ScheduleChromosome] {
        &self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Scores every chromosome.
    ///
    /// With `parallel`, chromosomes are scored on the rayon pool. Scores
    /// are collected in population order either way, and all of them are
    /// attached before this returns.
    pub fn evaluate(self, evaluator: &FitnessEvaluator<'_>, parallel: bool) -> EvaluatedPopulation {
        let fitness = if parallel {
            self.individuals
                .par_iter()
                .map(|ch| evaluator.evaluate(ch))
                .collect()
        } else {
            self.individuals
                .iter()
                .map(|ch| evaluator.evaluate(ch))
                .collect()
        };
        EvaluatedPopulation {
            individuals: self.individuals,
            fitness,
        }
    }
}

/// A population with one fitness value per chromosome.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedPopulation {
    individuals: Vec<ScheduleChromosome>,
    fitness: Vec<f64>,
}

impl EvaluatedPopulation {
    pub fn individuals(&self) -> &[ScheduleChromosome] {
        &self.individuals
    }

    /// Fitness values, parallel to [`individuals`](Self::individuals).
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Best, average, and worst fitness.
    pub fn stats(&self, generation: usize) -> GenerationStats {
        if self.fitness.is_empty() {
            return GenerationStats {
                generation,
                best: 0.0,
                average: 0.0,
                worst: 0.0,
            };
        }
        let best = self.fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = self.fitness.iter().copied().fold(f64::INFINITY, f64::min);
        let average = self.fitness.iter().sum::<f64>() / self.fitness.len() as f64;
        GenerationStats {
            generation,
            best,
            average,
            worst,
        }
    }

    /// Indices sorted by descending fitness; equal scores keep population order.
    pub fn ranked(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.fitness.len()).collect();
        order.sort_by(|&a, &b| self.fitness[b].total_cmp(&self.fitness[a]));
        order
    }

    /// The first chromosome with the highest fitness.
    pub fn best(&self) -> Option<(&ScheduleChromosome, f64)> {
        self.ranked()
            .first()
            .map(|&i| (&self.individuals[i], self.fitness[i]))
    }

    /// Copies of the `count` highest-ranked chromosomes.
    pub fn elites(&self, count: usize) -> Vec<ScheduleChromosome> {
        self.ranked()
            .into_iter()
            .take(count)
            .map(|i| self.individuals[i].clone())
            .collect()
    }

    /// Tournament selection of one parent.
    ///
    /// # Panics
    /// If the population is empty.
    pub fn select_parent<R: Rng>(&self, k: usize, rng: &mut R) -> &ScheduleChromosome {
        &self.individuals[tournament_index(&self.fitness, k, rng)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::Gene;
    use crate::models::reference_catalog;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn scored(fitness: &[f64]) -> EvaluatedPopulation {
        let individuals = (0..fitness.len())
            .map(|i| ScheduleChromosome::from_genes(vec![Gene::new(i, 0, 0)]))
            .collect();
        EvaluatedPopulation {
            individuals,
            fitness: fitness.to_vec(),
        }
    }

    #[test]
    fn test_random_population() {
        let catalog = reference_catalog();
        let mut rng = SmallRng::seed_from_u64(42);
        let pop = Population::random(&catalog, 25, &mut rng);

        assert_eq!(pop.len(), 25);
        assert!(pop.individuals().iter().all(|ch| ch.is_valid(&catalog)));
    }

    #[test]
    fn test_evaluate_serial_matches_parallel() {
        let catalog = reference_catalog();
        let evaluator = FitnessEvaluator::new(&catalog).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let pop = Population::random(&catalog, 64, &mut rng);

        let serial = pop.clone().evaluate(&evaluator, false);
        let parallel = pop.evaluate(&evaluator, true);
        assert_eq!(serial.len(), 64);
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_stats() {
        let pop = scored(&[1.0, -3.0, 4.0, 2.0]);
        let stats = pop.stats(7);
        assert_eq!(stats.generation, 7);
        assert_eq!(stats.best, 4.0);
        assert_eq!(stats.worst, -3.0);
        assert!((stats.average - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ranked_is_stable() {
        let pop = scored(&[1.0, 3.0, 1.0, 3.0, 2.0]);
        assert_eq!(pop.ranked(), vec![1, 3, 4, 0, 2]);
    }

    #[test]
    fn test_best_first_of_ties() {
        let pop = scored(&[1.0, 3.0, 3.0]);
        let (best, fitness) = pop.best().unwrap();
        assert_eq!(fitness, 3.0);
        assert_eq!(best, &pop.individuals()[1]);
        assert!(scored(&[]).best().is_none());
    }

    #[test]
    fn test_elites() {
        let pop = scored(&[1.0, 5.0, 3.0, 4.0]);
        let elites = pop.elites(2);
        assert_eq!(elites.len(), 2);
        assert_eq!(elites[0], pop.individuals()[1]);
        assert_eq!(elites[1], pop.individuals()[3]);
        assert_eq!(pop.elites(10).len(), 4);
    }

    #[test]
    fn test_select_parent_from_population() {
        let pop = scored(&[1.0, 5.0, 3.0]);
        let mut rng = SmallRng::seed_from_u64(42);
        let parent = pop.select_parent(3, &mut rng);
        assert_eq!(parent, &pop.individuals()[1]);
    }
}
