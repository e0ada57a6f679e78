//! # Stardisk Core
//!
//! Stochastic self-propagating star formation on a differentially rotating
//! disk.
//!
//! The disk is a set of concentric rings split into angular cells, with ring
//! `r` holding `(r + 1) * base` cells. Each tick:
//! - active cells age toward dormancy
//! - dormant cells next to a neighbour at the trigger age may ignite
//! - a few random cells ignite spontaneously
//! - every ring rotates by an angle inversely proportional to its radius
//!
//! The [`scheduler::Scheduler`] steps the engine over a time range and records
//! one [`CellRecord`] per cell per tick. [`cluster::analyze`] partitions the
//! active cells of a grid into connected clusters.
//!
//! ## Example
//!
//! ```
//! use stardisk_core::automaton::StarFormation;
//! use stardisk_core::config::StarFormationConfig;
//! use stardisk_core::grid::Grid;
//! use stardisk_core::scheduler::Scheduler;
//!
//! let grid = Grid::new(4, 4).unwrap();
//! let engine = StarFormation::with_seed(StarFormationConfig::default(), 42).unwrap();
//! let mut scheduler = Scheduler::new(grid, engine);
//! scheduler.seed_initial_stars(5).unwrap();
//!
//! let summary = scheduler.run(1.0, 10.0).unwrap();
//! assert_eq!(summary.ticks, 10);
//! assert_eq!(scheduler.history().len(), 10 * scheduler.grid().total_cells());
//! ```

pub mod analysis;
pub mod automaton;
pub mod cluster;
pub mod config;
pub mod error;
pub mod grid;
pub mod metrics;
pub mod scheduler;

pub use error::{Result, SimError};
pub use stardisk_data::{CellRecord, ClusterSummary, RunReport};
