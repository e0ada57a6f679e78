//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [disk]
//! ring_count = 8
//! base_cells_per_ring = 4
//!
//! [star_formation]
//! regen_time = 10
//! propagation_probability = 0.3
//! max_random_stars = 5
//! propagation_speed = 1
//!
//! [run]
//! dt = 1.0
//! t_end = 50.0
//! seed = 42
//! initial_stars = 20
//!
//! [analysis]
//! min_age = 1
//! ```

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Shape of the circular grid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DiskConfig {
    pub ring_count: usize,
    /// Cells added per ring level; ring `i` holds `(i + 1) * base_cells_per_ring` cells.
    pub base_cells_per_ring: usize,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            ring_count: 8,
            base_cells_per_ring: 4,
        }
    }
}

impl DiskConfig {
    /// Number of cells over all rings.
    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.base_cells_per_ring * self.ring_count * (self.ring_count + 1) / 2
    }
}

/// Parameters of the per-cell age state machine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StarFormationConfig {
    /// Age given to a cell on ignition, also its countdown length.
    pub regen_time: u32,
    pub propagation_probability: f64,
    pub max_random_stars: u32,
    /// How many ticks after a neighbour's ignition it can trigger a dormant cell.
    pub propagation_speed: u32,
}

impl Default for StarFormationConfig {
    fn default() -> Self {
        Self {
            regen_time: 10,
            propagation_probability: 0.3,
            max_random_stars: 5,
            propagation_speed: 1,
        }
    }
}

impl StarFormationConfig {
    /// Neighbour age that lets a dormant cell ignite.
    ///
    /// Not clamped: outside `[1, regen_time]` the value may be negative (no
    /// neighbour can ever match) or zero (dormant neighbours match).
    #[must_use]
    pub fn trigger_age(&self) -> i64 {
        i64::from(self.regen_time) + 1 - i64::from(self.propagation_speed)
    }

    /// Whether `propagation_speed` lies in `[1, regen_time]`.
    #[must_use]
    pub fn propagation_speed_in_range(&self) -> bool {
        (1..=self.regen_time).contains(&self.propagation_speed)
    }
}

/// Time stepping and initial conditions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub dt: f64,
    pub t_end: f64,
    /// Fixed seed for reproducible runs; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Dormant cells ignited before the first tick.
    pub initial_stars: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            t_end: 50.0,
            seed: None,
            initial_stars: 20,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Cells at or above this age take part in clustering.
    pub min_age: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { min_age: 1 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SimConfig {
    #[serde(default)]
    pub disk: DiskConfig,
    #[serde(default)]
    pub star_formation: StarFormationConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn ensure(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(SimError::configuration(message))
    }
}

impl SimConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns the first violation as [`SimError::Configuration`]. An
    /// out-of-range `propagation_speed` is not an error, see [`Self::warnings`].
    pub fn validate(&self) -> Result<()> {
        ensure(self.disk.ring_count > 0, "Ring count must be positive")?;
        ensure(
            self.disk.base_cells_per_ring > 0,
            "Cells per ring must be positive",
        )?;

        ensure(
            self.star_formation.regen_time > 0,
            "Regeneration time must be positive",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.star_formation.propagation_probability),
            "Propagation probability must be in [0.0, 1.0]",
        )?;

        ensure(
            self.run.dt.is_finite() && self.run.dt > 0.0,
            "Timestep must be positive",
        )?;
        ensure(self.run.t_end.is_finite(), "End time must be finite")?;
        ensure(
            self.run.initial_stars <= self.disk.total_cells(),
            "Initial stars exceed the number of cells",
        )?;

        Ok(())
    }

    /// Non-fatal configuration issues worth reporting to the user.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.star_formation.propagation_speed_in_range() {
            warnings.push(format!(
                "propagation_speed {} outside [1, {}]: trigger age {} disables ordinary propagation",
                self.star_formation.propagation_speed,
                self.star_formation.regen_time,
                self.star_formation.trigger_age()
            ));
        }
        warnings
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Hash of the parameters that shape the simulated model.
    ///
    /// Run length, seed and analysis threshold are left out so that runs of
    /// the same model can be grouped.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.disk).as_bytes());
        hasher.update(format!("{:?}", self.star_formation).as_bytes());
        hex::encode(hasher.finalize())
    }
}
