//! Selection and adaptive mutation control.
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::MutationState;
//!
//! let mut state = MutationState::new(0.01, 0.0001, 0.02);
//! state.observe(-4.0);
//! let improvement = state.observe(-3.99);
//! assert!(state.adapt(improvement)); // 0.25% < 2%: rate halves
//! assert!((state.rate() - 0.005).abs() < 1e-12);
//! ```

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tournament selection over a fitness vector.
///
/// Draws `k` distinct indices uniformly (`k` is clamped to the population
/// size) and returns the one with the highest fitness. Ties go to the
/// contestant drawn first. Returns 0 for an empty slice.
pub fn tournament_index<R: Rng>(fitness: &[f64], k: usize, rng: &mut R) -> usize {
    if fitness.is_empty() {
        return 0;
    }
    let k = k.clamp(1, fitness.len());

    let mut best: Option<usize> = None;
    for idx in index::sample(rng, fitness.len(), k) {
        match best {
            Some(b) if fitness[idx] <= fitness[b] => {}
            _ => best = Some(idx),
        }
    }
    best.unwrap_or(0)
}

/// Relative change of `current` over `previous`, as a fraction.
///
/// A zero `previous` yields zero improvement.
pub fn relative_improvement(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous.abs()
    }
}

/// Mutation rate carried across generations.
///
/// The rate only ever halves, and never drops below `floor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationState {
    rate: f64,
    floor: f64,
    halving_threshold: f64,
    /// Average population fitness per observed generation.
    history: Vec<f64>,
}

impl MutationState {
    /// Creates the state before generation 0.
    pub fn new(initial_rate: f64, floor: f64, halving_threshold: f64) -> Self {
        Self {
            rate: initial_rate,
            floor,
            halving_threshold,
            history: Vec::new(),
        }
    }

    /// Current per-gene mutation probability.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Average fitness of every observed generation, oldest first.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Records a generation's average fitness.
    ///
    /// Returns the relative improvement over the previous generation, or
    /// `None` for the first observation.
    pub fn observe(&mut self, average: f64) -> Option<f64> {
        let improvement = self
            .history
            .last()
            .map(|&previous| relative_improvement(previous, average));
        self.history.push(average);
        improvement
    }

    /// Halves the rate when improvement is below the threshold.
    ///
    /// Returns whether the rate changed.
    pub fn adapt(&mut self, improvement: Option<f64>) -> bool {
        match improvement {
            Some(i) if i < self.halving_threshold && self.rate > self.floor => {
                self.rate = (self.rate / 2.0).max(self.floor);
                true
            }
            _ => false,
        }
    }
}
