//! Configuration errors.
//!
//! The optimizer has no runtime failure modes of its own: every gene is
//! drawn from a non-empty domain and constraint violations only lower the
//! fitness. What can go wrong is the caller's setup, and that is reported
//! before the first generation runs.

use thiserror::Error;

use crate::validation::ValidationError;

/// Error returned when a run cannot start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Tournament selection and crossover need at least two individuals.
    #[error("population_size must be at least 2 (got {0})")]
    PopulationTooSmall(usize),

    /// A numeric parameter is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// The catalog failed validation.
    #[error("invalid catalog: {}", summarize(.0))]
    InvalidCatalog(Vec<ValidationError>),
}

impl ConfigError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
