//! Genetic-algorithm course timetabling for the U-Engine ecosystem.
//!
//! Assigns every activity in a [`Catalog`](models::Catalog) a room, a time
//! slot, and a facilitator, searching for the assignment with the highest
//! soft-constraint fitness.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Activity`, `Room`, `TimeSlot`,
//!   `Facilitator`, `Catalog`, `ScoringRules`, `Schedule`
//! - **`validation`**: Input integrity checks (empty domains, duplicate IDs,
//!   dangling facilitator and activity refs)
//! - **`ga`**: Chromosome encoding, fitness evaluation, selection,
//!   crossover, adaptive mutation, and the generational driver
//! - **`error`**: Configuration and catalog errors
//!
//! # Example
//!
//! ```no_run
//! use u_timetable::ga::{run_ga, GaConfig};
//! use u_timetable::models::reference_catalog;
//!
//! let catalog = reference_catalog();
//! let result = run_ga(&catalog, &GaConfig::default().with_seed(42))?;
//! let schedule = result.schedule(&catalog);
//! assert_eq!(schedule.len(), catalog.activity_count());
//! # Ok::<(), u_timetable::ConfigError>(())
//! ```
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"

pub mod error;
pub mod ga;
pub mod models;
pub mod validation;

pub use error::ConfigError;
