//! Startup seeding of a generated example organization.
//!
//! Behind the `example-data` feature. When enabled through configuration,
//! an empty person store is populated with a deterministic organization so
//! a fresh deployment has something to browse.

mod config;
mod startup;

pub use config::ExampleOrgSettings;
pub use startup::{SeedOutcome, SeedingError, seed_example_org_on_startup};
