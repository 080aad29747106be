//! Deterministic organization generation.
//!
//! The generator builds a forest-shaped organization from an [`OrgSpec`]:
//! person 0 is the root, and every later person reports to someone generated
//! earlier, so inserting the records in order never breaks a manager
//! foreign key. The same spec always produces identical output.

use std::collections::HashSet;

use chrono::NaiveDate;
use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GenerationError;
use crate::seed::{OrgSpec, PersonSeed, PersonStatusSeed, PersonTypeSeed};

/// Maximum number of attempts to generate a unique full name.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Departments with role titles used below the management levels.
const DEPARTMENTS: &[(&str, &[&str])] = &[
    (
        "Engineering",
        &["Staff Engineer", "Senior Engineer", "Software Engineer"],
    ),
    (
        "Sales",
        &["Account Executive", "Sales Representative", "Sales Analyst"],
    ),
    (
        "Marketing",
        &["Brand Strategist", "Content Specialist", "Marketing Analyst"],
    ),
    (
        "Finance",
        &["Senior Accountant", "Financial Analyst", "Payroll Specialist"],
    ),
    (
        "Human Resources",
        &["Talent Partner", "HR Generalist", "Recruiter"],
    ),
    (
        "Operations",
        &["Program Manager", "Operations Analyst", "Logistics Coordinator"],
    ),
];

/// Office locations assigned round-robin-by-chance.
const LOCATIONS: &[&str] = &[
    "London",
    "New York",
    "Berlin",
    "Lisbon",
    "Toronto",
    "Singapore",
];

/// Earliest possible hire date; offsets are added to this.
const HIRE_EPOCH: (i32, u32, u32) = (2015, 1, 5);

/// Spread of hire dates in days (roughly ten years).
const HIRE_SPREAD_DAYS: u64 = 3600;

/// Generate a deterministic example organization.
///
/// # Errors
///
/// Returns [`GenerationError`] if the spec requests zero people, allows no
/// direct reports, or a unique name cannot be found within the retry
/// budget.
///
/// # Example
///
/// ```
/// use example_data::{OrgSpec, generate_example_org};
///
/// let people = generate_example_org(&OrgSpec::new(1, 12)).expect("generated");
/// assert_eq!(people.len(), 12);
/// let roots = people.iter().filter(|p| p.manager_index.is_none()).count();
/// assert_eq!(roots, 1);
/// ```
pub fn generate_example_org(spec: &OrgSpec) -> Result<Vec<PersonSeed>, GenerationError> {
    if spec.people == 0 {
        return Err(GenerationError::EmptyOrganization { requested: 0 });
    }
    if spec.max_reports == 0 {
        return Err(GenerationError::NoReportCapacity { max_reports: 0 });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(spec.seed);
    let mut taken_names = HashSet::new();
    let mut people: Vec<PersonSeed> = Vec::with_capacity(spec.people);
    // Parallel bookkeeping: organizational depth and direct-report usage.
    let mut levels: Vec<usize> = Vec::with_capacity(spec.people);
    let mut report_counts: Vec<usize> = Vec::with_capacity(spec.people);

    for index in 0..spec.people {
        let name = unique_name(&mut rng, &mut taken_names)?;

        let (manager_index, level, department) = if index == 0 {
            (None, 0, "Executive".to_owned())
        } else {
            let eligible: Vec<usize> = report_counts
                .iter()
                .take(index)
                .enumerate()
                .filter(|&(_, &count)| count < spec.max_reports)
                .map(|(i, _)| i)
                .collect();
            // The root always has capacity before anyone else fills up, so
            // eligibility can only be empty when max_reports is 0, which was
            // rejected above. Fall back to the root to keep this total.
            let manager = eligible.choose(&mut rng).copied().unwrap_or(0);
            if let Some(count) = report_counts.get_mut(manager) {
                *count += 1;
            }

            let manager_level = levels.get(manager).copied().unwrap_or(0);
            let department = match people.get(manager) {
                Some(boss) if manager_level > 0 => boss.department.clone(),
                _ => pick_department(&mut rng).to_owned(),
            };
            (Some(manager), manager_level + 1, department)
        };

        let job_title = title_for(&mut rng, level, &department);
        let slug = slugify(&name);

        people.push(PersonSeed {
            job_title,
            manager_index,
            photo_path: Some(format!("/photos/{slug}.jpg")),
            person_type: if index != 0 && rng.random_range(0..10) == 0 {
                PersonTypeSeed::Partner
            } else {
                PersonTypeSeed::Employee
            },
            status: if index != 0 && rng.random_range(0..20) == 0 {
                PersonStatusSeed::Inactive
            } else {
                PersonStatusSeed::Active
            },
            email: Some(format!("{slug}@example.com")),
            location: LOCATIONS.choose(&mut rng).map(|l| (*l).to_owned()),
            hire_date: hire_date(&mut rng),
            department,
            name,
        });
        levels.push(level);
        report_counts.push(0);
    }

    Ok(people)
}

fn unique_name(
    rng: &mut ChaCha8Rng,
    taken: &mut HashSet<String>,
) -> Result<String, GenerationError> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let first: String = FirstName(EN).fake_with_rng(rng);
        let last: String = LastName(EN).fake_with_rng(rng);
        let name = format!("{first} {last}");
        if taken.insert(name.clone()) {
            return Ok(name);
        }
    }
    Err(GenerationError::NameExhausted {
        attempts: MAX_NAME_ATTEMPTS,
    })
}

fn pick_department(rng: &mut ChaCha8Rng) -> &'static str {
    DEPARTMENTS.choose(rng).map_or("Operations", |(name, _)| name)
}

fn title_for(rng: &mut ChaCha8Rng, level: usize, department: &str) -> String {
    match level {
        0 => "Chief Executive Officer".to_owned(),
        1 => format!("Head of {department}"),
        2 => format!("{department} Manager"),
        _ => DEPARTMENTS
            .iter()
            .find(|(name, _)| *name == department)
            .and_then(|(_, roles)| roles.choose(rng))
            .map_or_else(|| "Specialist".to_owned(), |role| (*role).to_owned()),
    }
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '.' })
        .collect()
}

fn hire_date(rng: &mut ChaCha8Rng) -> Option<NaiveDate> {
    let (year, month, day) = HIRE_EPOCH;
    let offset = rng.random_range(0..HIRE_SPREAD_DAYS);
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|epoch| epoch.checked_add_days(chrono::Days::new(offset)))
}
