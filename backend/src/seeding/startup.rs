//! Startup seeding orchestration.

use example_data::{
    GenerationError, OrgSpec, PersonSeed, PersonStatusSeed, PersonTypeSeed, generate_example_org,
};
use thiserror::Error;
use tracing::info;

use crate::domain::person::{NewPerson, PersonStatus, PersonType};
use crate::domain::ports::{PersonFilter, PersonRepository, PersonRepositoryError};
use crate::seeding::config::ExampleOrgSettings;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum SeedingError {
    /// Organization generation failed.
    #[error("example organization generation error: {0}")]
    Generation(#[from] GenerationError),
    /// Persisting a generated person failed.
    #[error("example organization persistence error: {0}")]
    Store(#[from] PersonRepositoryError),
    /// A generated record pointed at a manager that was never inserted.
    #[error("generated person {index} references unknown manager index {manager_index}")]
    UnknownManager {
        /// Position of the record within the generated vector.
        index: usize,
        /// The dangling manager index.
        manager_index: usize,
    },
}

/// Summary of an applied seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    /// RNG seed the organization was generated from.
    pub seed: u64,
    /// Number of people inserted.
    pub inserted: usize,
}

/// Populate an empty store with a generated organization when enabled.
///
/// Seeding is skipped when the settings disable it and when the store
/// already holds people, so restarting a deployment never duplicates the
/// example organization.
///
/// # Errors
///
/// Returns [`SeedingError`] when generation or persistence fails.
pub async fn seed_example_org_on_startup(
    settings: &ExampleOrgSettings,
    store: &dyn PersonRepository,
) -> Result<Option<SeedOutcome>, SeedingError> {
    if !settings.enabled {
        info!(reason = "disabled", "example organization seeding skipped");
        return Ok(None);
    }

    let existing = store.count(&PersonFilter::default()).await?;
    if existing > 0 {
        info!(
            existing,
            reason = "store not empty",
            "example organization seeding skipped"
        );
        return Ok(None);
    }

    let spec = OrgSpec::new(settings.seed(), settings.count());
    let seeds = generate_example_org(&spec)?;

    // Managers always precede their reports, so ids resolve in one pass.
    let mut assigned_ids: Vec<i32> = Vec::with_capacity(seeds.len());
    for (index, seed) in seeds.into_iter().enumerate() {
        let manager_id = match seed.manager_index {
            Some(manager_index) => Some(
                assigned_ids
                    .get(manager_index)
                    .copied()
                    .ok_or(SeedingError::UnknownManager {
                        index,
                        manager_index,
                    })?,
            ),
            None => None,
        };
        let person = store.create(new_person_from_seed(seed, manager_id)).await?;
        assigned_ids.push(person.id);
    }

    let outcome = SeedOutcome {
        seed: spec.seed,
        inserted: assigned_ids.len(),
    };
    info!(
        seed = outcome.seed,
        inserted = outcome.inserted,
        "example organization seeded"
    );
    Ok(Some(outcome))
}

fn new_person_from_seed(seed: PersonSeed, manager_id: Option<i32>) -> NewPerson {
    NewPerson {
        name: seed.name,
        job_title: seed.job_title,
        department: seed.department,
        manager_id,
        photo_path: seed.photo_path,
        person_type: match seed.person_type {
            PersonTypeSeed::Employee => PersonType::Employee,
            PersonTypeSeed::Partner => PersonType::Partner,
        },
        status: match seed.status {
            PersonStatusSeed::Active => PersonStatus::Active,
            PersonStatusSeed::Inactive => PersonStatus::Inactive,
        },
        email: seed.email,
        phone: None,
        location: seed.location,
        hire_date: seed.hire_date,
    }
}
