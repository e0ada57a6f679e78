//! Per-tick star formation rules applied over the whole grid.
//!
//! A tick runs three phases in a fixed order: [`StarFormation::propagate`]
//! (aging, ignition by neighbours, commit), [`StarFormation::randomize`]
//! (spontaneous ignition) and [`StarFormation::rotate`] (differential
//! rotation). All random draws come from the engine's own seeded stream, in
//! ring-then-cell order, so a fixed seed reproduces a run exactly.

use crate::config::{SimConfig, StarFormationConfig};
use crate::error::{Result, SimError};
use crate::grid::{Cell, Grid};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Outcome of the read phase for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Pending {
    /// Active cell counting down to this age.
    Age(u32),
    /// Dormant cell next to a neighbour at the trigger age.
    Triggered,
    Dormant,
}

/// Counters for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Cells ignited by a neighbour.
    pub propagated: usize,
    /// Spontaneous ignitions drawn (a cell may be drawn twice).
    pub random: usize,
}

/// The star formation state machine and its random stream.
pub struct StarFormation {
    params: StarFormationConfig,
    rng: ChaCha8Rng,
}

impl StarFormation {
    pub fn new(params: StarFormationConfig, rng: ChaCha8Rng) -> Result<Self> {
        if params.regen_time == 0 {
            return Err(SimError::configuration(
                "Regeneration time must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&params.propagation_probability) {
            return Err(SimError::configuration(
                "Propagation probability must be in [0.0, 1.0]",
            ));
        }
        if !params.propagation_speed_in_range() {
            tracing::warn!(
                propagation_speed = params.propagation_speed,
                regen_time = params.regen_time,
                trigger_age = params.trigger_age(),
                "Propagation speed out of range, neighbour ignition will not behave normally"
            );
        }
        Ok(Self { params, rng })
    }

    pub fn with_seed(params: StarFormationConfig, seed: u64) -> Result<Self> {
        Self::new(params, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Builds the engine from a full configuration, seeding from entropy when
    /// no seed is configured.
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        let rng = if let Some(seed) = config.run.seed {
            ChaCha8Rng::seed_from_u64(seed)
        } else {
            ChaCha8Rng::from_entropy()
        };
        Self::new(config.star_formation.clone(), rng)
    }

    pub fn params(&self) -> &StarFormationConfig {
        &self.params
    }

    /// Runs one full tick: propagate, randomize, rotate.
    pub fn tick(&mut self, grid: &mut Grid) -> TickOutcome {
        let propagated = self.propagate(grid);
        let random = self.randomize(grid);
        Self::rotate(grid);
        TickOutcome { propagated, random }
    }

    /// Ages active cells and ignites dormant cells next to a triggering
    /// neighbour, then commits every new age at once.
    ///
    /// Neighbour reads all see the pre-tick ages. Returns the number of cells
    /// ignited.
    pub fn propagate(&mut self, grid: &mut Grid) -> usize {
        let trigger = self.params.trigger_age();

        let pending: Vec<Pending> = {
            let view: &Grid = grid;
            let cells: Vec<&Cell> = view.cells().collect();
            cells
                .par_iter()
                .map(|cell| {
                    if cell.current_age > 0 {
                        Pending::Age(cell.current_age - 1)
                    } else if view
                        .get_neighbours(cell)
                        .iter()
                        .any(|n| i64::from(n.current_age) == trigger)
                    {
                        Pending::Triggered
                    } else {
                        Pending::Dormant
                    }
                })
                .collect()
        };

        let regen_time = self.params.regen_time;
        let probability = self.params.propagation_probability;
        let mut ignited = 0;
        let cells = grid.rings.iter_mut().flat_map(|r| r.cells.iter_mut());
        for (cell, decision) in cells.zip(pending) {
            cell.next_age = match decision {
                Pending::Age(age) => age,
                Pending::Triggered => {
                    if self.rng.gen::<f64>() < probability {
                        ignited += 1;
                        regen_time
                    } else {
                        0
                    }
                }
                Pending::Dormant => 0,
            };
        }

        for cell in grid.rings.iter_mut().flat_map(|r| r.cells.iter_mut()) {
            cell.current_age = cell.next_age;
        }

        ignited
    }

    /// Ignites between 0 and `max_random_stars` uniformly chosen cells.
    ///
    /// Already active cells are reset to full age. Returns the number of draws.
    pub fn randomize(&mut self, grid: &mut Grid) -> usize {
        let count = self.rng.gen_range(0..=self.params.max_random_stars) as usize;
        for _ in 0..count {
            let ring_index = self.rng.gen_range(0..grid.ring_count);
            let ring = &mut grid.rings[ring_index];
            let index = self.rng.gen_range(0..ring.len());
            ring.cells[index].current_age = self.params.regen_time;
        }
        count
    }

    /// Advances every ring by `1 / (ring_index + 1)` radians.
    pub fn rotate(grid: &mut Grid) {
        for ring in &mut grid.rings {
            let angle = 1.0 / (ring.index + 1) as f64;
            ring.rotate_by(angle);
        }
    }

    /// Ignites `count` distinct dormant cells before a run.
    pub fn seed_initial_stars(&mut self, grid: &mut Grid, count: usize) -> Result<()> {
        let dormant = grid.cells().filter(|c| c.is_dormant()).count();
        if count > dormant {
            return Err(SimError::configuration(format!(
                "Cannot seed {count} stars on {dormant} dormant cells"
            )));
        }

        for _ in 0..count {
            loop {
                let ring_index = self.rng.gen_range(0..grid.ring_count);
                let ring = &mut grid.rings[ring_index];
                let index = self.rng.gen_range(0..ring.len());
                let cell = &mut ring.cells[index];
                if cell.is_dormant() {
                    cell.current_age = self.params.regen_time;
                    break;
                }
            }
        }
        Ok(())
    }
}
