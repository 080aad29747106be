//! Deterministic example organization generation for demonstration purposes.
//!
//! This crate produces believable, reproducible people records for an
//! organizational directory. It is independent of backend domain types to
//! avoid circular dependencies: seeds carry plain values that the backend
//! converts at the point of use.
//!
//! The same [`OrgSpec`] always produces an identical organization, so demo
//! environments and tests can rely on stable data. Generated organizations
//! are forest-shaped: exactly one root (no manager) and every other person
//! reporting to someone generated before them.
//!
//! # Example
//!
//! ```
//! use example_data::{OrgSpec, generate_example_org};
//!
//! let spec = OrgSpec::new(42, 25);
//! let people = generate_example_org(&spec).expect("generation succeeds");
//!
//! assert_eq!(people.len(), 25);
//! assert!(people[0].manager_index.is_none());
//! // Same spec produces identical people.
//! assert_eq!(people, generate_example_org(&spec).expect("generation succeeds"));
//! ```

mod error;
mod generator;
mod seed;

pub use error::GenerationError;
pub use generator::generate_example_org;
pub use seed::{OrgSpec, PersonSeed, PersonStatusSeed, PersonTypeSeed};
