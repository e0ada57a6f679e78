//! Circular grid made of concentric rings with a growing number of cells.
//!
//! Ring `i` holds `(i + 1) * base_cells_per_ring` cells of equal angular
//! width, so every ring has exactly `base_cells_per_ring` more cells than the
//! ring inside it. Neighbour resolution relies on that fixed relation: the
//! cells of an adjacent ring overlapping a given cell always lie in a window
//! of `base_cells_per_ring + 1` indices next to the cell's own index, so no
//! scan over the whole ring is needed.
//!
//! Cells and rings refer back to their owner through plain indices; every
//! traversal goes through the owning [`Grid`].
//!
//! Ring offsets accumulate without normalization. After long runs the
//! rotated bounds lose precision in their fractional part; the local bounds
//! used for neighbour resolution are unaffected.

use crate::config::DiskConfig;
use crate::error::{Result, SimError};
use stardisk_data::CellRecord;
use std::f64::consts::TAU;

/// Smallest grid unit: an age state and a fixed angular span.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Position within the owning ring.
    pub index: usize,
    /// Index of the owning ring.
    pub ring: usize,
    /// 0 is dormant, `1..=regen_time` is active and counting down.
    pub current_age: u32,
    /// Staging value for the synchronous update.
    pub next_age: u32,
    /// Start angle in the ring's local (unrotated) frame.
    pub theta1: f64,
    /// End angle in the ring's local (unrotated) frame.
    pub theta2: f64,
    /// `base_cells_per_ring * ring + index`. Not dense, and collides across
    /// rings once ring sizes exceed `base_cells_per_ring`.
    pub unique_id: usize,
}

impl Cell {
    fn new(ring: usize, index: usize, base_cells_per_ring: usize) -> Self {
        let level = ring + 1;
        let delta = TAU / (level * base_cells_per_ring) as f64;
        let theta1 = index as f64 * delta;
        Self {
            index,
            ring,
            current_age: 0,
            next_age: 0,
            theta1,
            theta2: theta1 + delta,
            unique_id: base_cells_per_ring * ring + index,
        }
    }

    #[inline]
    pub fn is_dormant(&self) -> bool {
        self.current_age == 0
    }

    /// Half-open interval overlap on local bounds. Symmetric in its arguments.
    #[inline]
    fn overlaps(&self, other: &Cell) -> bool {
        (self.theta1 <= other.theta1 && other.theta1 < self.theta2)
            || (other.theta1 < self.theta1 && self.theta1 < other.theta2)
    }
}

/// One concentric band of cells. Rotates rigidly by `offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub index: usize,
    /// Accumulated rotation in radians. Never normalized.
    pub offset: f64,
    pub cells: Vec<Cell>,
}

impl Ring {
    fn new(index: usize, base_cells_per_ring: usize) -> Self {
        let count = (index + 1) * base_cells_per_ring;
        Self {
            index,
            offset: 0.0,
            cells: (0..count)
                .map(|i| Cell::new(index, i, base_cells_per_ring))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `index` modulo the ring size, negative indices included.
    #[inline]
    pub fn cell_wrapped(&self, index: isize) -> &Cell {
        let len = self.cells.len() as isize;
        &self.cells[index.rem_euclid(len) as usize]
    }

    /// Current start angle of a cell of this ring, rotation included.
    #[inline]
    pub fn get_theta1(&self, cell: &Cell) -> f64 {
        cell.theta1 + self.offset
    }

    /// Current end angle of a cell of this ring, rotation included.
    #[inline]
    pub fn get_theta2(&self, cell: &Cell) -> f64 {
        cell.theta2 + self.offset
    }

    pub fn rotate_by(&mut self, angle: f64) {
        self.offset += angle;
    }
}

/// The disk: an ordered sequence of rings, innermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub ring_count: usize,
    pub base_cells_per_ring: usize,
    pub rings: Vec<Ring>,
}

impl Grid {
    pub fn new(ring_count: usize, base_cells_per_ring: usize) -> Result<Self> {
        if ring_count == 0 {
            return Err(SimError::configuration("Ring count must be positive"));
        }
        if base_cells_per_ring == 0 {
            return Err(SimError::configuration("Cells per ring must be positive"));
        }
        Ok(Self {
            ring_count,
            base_cells_per_ring,
            rings: (0..ring_count)
                .map(|i| Ring::new(i, base_cells_per_ring))
                .collect(),
        })
    }

    pub fn from_config(config: &DiskConfig) -> Result<Self> {
        Self::new(config.ring_count, config.base_cells_per_ring)
    }

    pub fn get_ring(&self, ring_index: usize) -> Result<&Ring> {
        self.rings.get(ring_index).ok_or(SimError::RingIndex {
            index: ring_index,
            ring_count: self.ring_count,
        })
    }

    pub fn get_ring_mut(&mut self, ring_index: usize) -> Result<&mut Ring> {
        let ring_count = self.ring_count;
        self.rings.get_mut(ring_index).ok_or(SimError::RingIndex {
            index: ring_index,
            ring_count,
        })
    }

    /// Cell at `cell_index` modulo the ring size.
    pub fn get_cell(&self, ring_index: usize, cell_index: isize) -> Result<&Cell> {
        Ok(self.get_ring(ring_index)?.cell_wrapped(cell_index))
    }

    /// Spatial neighbours of `cell`.
    ///
    /// Order: overlapping cells of the inner ring, the left and right cells of
    /// the same ring (always present, even when they coincide), then
    /// overlapping cells of the outer ring. The list is the raw window scan:
    /// on ring 1 the inner window wraps around ring 0 and may yield the same
    /// cell twice, and each occurrence counts as a separate adjacency.
    pub fn get_neighbours(&self, cell: &Cell) -> Vec<&Cell> {
        let mut neighbours = Vec::with_capacity(4 + 2 * self.base_cells_per_ring);
        let base = self.base_cells_per_ring as isize;
        let index = cell.index as isize;

        if cell.ring > 0 {
            let inner = &self.rings[cell.ring - 1];
            self.collect_overlapping(cell, inner, index - base, index, &mut neighbours);
        }

        let own = &self.rings[cell.ring];
        neighbours.push(own.cell_wrapped(index - 1));
        neighbours.push(own.cell_wrapped(index + 1));

        if cell.ring + 1 < self.ring_count {
            let outer = &self.rings[cell.ring + 1];
            self.collect_overlapping(cell, outer, index, index + base, &mut neighbours);
        }

        neighbours
    }

    fn collect_overlapping<'a>(
        &self,
        cell: &Cell,
        ring: &'a Ring,
        from: isize,
        to: isize,
        out: &mut Vec<&'a Cell>,
    ) {
        for i in from..=to {
            let guess = ring.cell_wrapped(i);
            if guess.overlaps(cell) {
                out.push(guess);
            }
        }
    }

    /// All cells, ring by ring, innermost first.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rings.iter().flat_map(|r| r.cells.iter())
    }

    pub fn total_cells(&self) -> usize {
        self.rings.iter().map(Ring::len).sum()
    }

    /// Largest `unique_id` on the grid.
    pub fn max_unique_id(&self) -> usize {
        self.cells().map(|c| c.unique_id).max().unwrap_or(0)
    }

    /// Number of cells with `current_age >= min_age`.
    pub fn count_at_least(&self, min_age: u32) -> usize {
        self.cells().filter(|c| c.current_age >= min_age).count()
    }

    /// Current start angle of `cell`, rotation included.
    pub fn get_theta1(&self, cell: &Cell) -> f64 {
        self.rings[cell.ring].get_theta1(cell)
    }

    /// Current end angle of `cell`, rotation included.
    pub fn get_theta2(&self, cell: &Cell) -> f64 {
        self.rings[cell.ring].get_theta2(cell)
    }

    /// Loads the state recorded for one tick back into the grid.
    ///
    /// Ages are copied as recorded; each ring's offset is recovered from the
    /// difference between the recorded and the local start angle.
    pub fn restore_tick(&mut self, records: &[CellRecord]) -> Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        if records.iter().any(|r| r.t != first.t) {
            return Err(SimError::history(
                "records to restore span more than one timestamp",
            ));
        }

        // nothing is written unless every record addresses a cell of this grid
        for record in records {
            let len = self.get_ring(record.parent_ring)?.len();
            if record.id >= len {
                return Err(SimError::CellIndex {
                    ring: record.parent_ring,
                    index: record.id,
                    len,
                });
            }
        }

        for record in records {
            let ring = &mut self.rings[record.parent_ring];
            let cell = &mut ring.cells[record.id];
            cell.current_age = record.age;
            cell.next_age = record.age;
            let offset = record.theta1 - cell.theta1;
            ring.offset = offset;
        }
        Ok(())
    }
}
