//! GA-based timetable optimization.
//!
//! # Encoding
//!
//! One gene per activity, indexed by activity position. Each gene holds a
//! room, time slot, and facilitator index into the [`Catalog`]. Every
//! chromosome therefore contains every activity exactly once.
//!
//! # Submodules
//!
//! - [`operators`]: Tournament selection and the adaptive mutation rate
//!
//! # Example
//!
//! ```no_run
//! use u_timetable::ga::{run_ga, GaConfig};
//! use u_timetable::models::reference_catalog;
//!
//! let catalog = reference_catalog();
//! let result = run_ga(&catalog, &GaConfig::default()).unwrap();
//! println!("best fitness {:.3} after {} generations", result.best_fitness, result.generations);
//! ```
//!
//! [`Catalog`]: crate::models::Catalog

mod chromosome;
mod fitness;
pub mod operators;
mod population;
mod runner;

pub use chromosome::{crossover_at, mutate_genes, single_point_crossover, Gene, ScheduleChromosome};
pub use fitness::{FitnessBreakdown, FitnessEvaluator};
pub use population::{EvaluatedPopulation, GenerationStats, Population};
pub use runner::{run_ga, run_ga_with_rng, GaConfig, GaResult, Termination};
