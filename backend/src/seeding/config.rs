//! Example organization configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// RNG seed used when none is configured.
const DEFAULT_SEED: u64 = 42;

/// Number of people generated when none is configured.
const DEFAULT_COUNT: usize = 50;

/// Configuration values controlling example organization seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXAMPLE_ORG")]
pub struct ExampleOrgSettings {
    /// Enable example organization seeding on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Optional RNG seed override; equal seeds yield equal organizations.
    pub seed: Option<u64>,
    /// Optional override for the number of people generated.
    pub count: Option<usize>,
}

impl ExampleOrgSettings {
    /// Return the configured RNG seed, falling back to the default.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Return the configured people count, falling back to the default.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_COUNT)
    }
}
