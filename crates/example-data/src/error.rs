//! Error types for the example-data crate.

use thiserror::Error;

/// Errors that can occur during organization generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The spec requested an empty organization.
    #[error("organization must contain at least one person, requested {requested}")]
    EmptyOrganization {
        /// The requested people count.
        requested: usize,
    },

    /// The spec allows no direct reports, so nobody after the root could be
    /// placed.
    #[error("max_reports must be at least 1, got {max_reports}")]
    NoReportCapacity {
        /// The configured span of control.
        max_reports: usize,
    },

    /// A unique name could not be found within the retry budget.
    #[error("failed to generate a unique name after {attempts} attempts")]
    NameExhausted {
        /// Number of attempts made.
        attempts: usize,
    },
}
