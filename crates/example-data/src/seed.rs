//! Generated person seed types.
//!
//! Output types from organization generation. They are independent of
//! backend domain types; the backend converts them when seeding.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Person type for a generated record.
///
/// Mirrors the backend's `PersonType` enum without creating a dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonTypeSeed {
    /// A regular employee.
    #[default]
    Employee,
    /// An external partner.
    Partner,
}

/// Person status for a generated record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonStatusSeed {
    /// Currently part of the organization.
    #[default]
    Active,
    /// No longer active but still listed.
    Inactive,
}

/// Specification for a generated organization.
///
/// The `seed` value initialises the RNG, so equal specs always yield equal
/// organizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgSpec {
    /// RNG seed controlling every generated value.
    pub seed: u64,
    /// Number of people to generate, root included.
    pub people: usize,
    /// Maximum direct reports per manager.
    pub max_reports: usize,
}

impl OrgSpec {
    /// Default span of control when not configured.
    pub const DEFAULT_MAX_REPORTS: usize = 6;

    /// Build a spec with the default span of control.
    #[must_use]
    pub fn new(seed: u64, people: usize) -> Self {
        Self {
            seed,
            people,
            max_reports: Self::DEFAULT_MAX_REPORTS,
        }
    }

    /// Override the maximum number of direct reports per manager.
    #[must_use]
    pub fn with_max_reports(mut self, max_reports: usize) -> Self {
        self.max_reports = max_reports;
        self
    }
}

/// A generated person record.
///
/// `manager_index` points into the generated vector rather than carrying a
/// database id: managers always precede their reports, so a consumer can
/// insert records in order and resolve foreign keys as it goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSeed {
    /// Full display name, unique within the organization.
    pub name: String,
    /// Role title appropriate to the person's level.
    pub job_title: String,
    /// Department name.
    pub department: String,
    /// Index of the manager within the generated vector; `None` for the root.
    pub manager_index: Option<usize>,
    /// Relative photo path derived from the name.
    pub photo_path: Option<String>,
    /// Employee or partner.
    pub person_type: PersonTypeSeed,
    /// Active or inactive.
    pub status: PersonStatusSeed,
    /// Work email derived from the name.
    pub email: Option<String>,
    /// Office location.
    pub location: Option<String>,
    /// Date the person joined.
    pub hire_date: Option<NaiveDate>,
}
