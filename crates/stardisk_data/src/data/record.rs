use serde::{Deserialize, Serialize};

/// State of one cell at one timestamp.
///
/// A run's history is the concatenation of one record per cell per tick, in
/// ring-then-cell order. Field names are part of the output format and are
/// keyed on by downstream analysis (`t` and `age` in particular).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CellRecord {
    /// Timestamp of the tick that produced this record.
    pub t: f64,
    /// Index of the cell within its ring.
    pub id: usize,
    pub age: u32,
    /// Index of the ring owning the cell.
    pub parent_ring: usize,
    /// Start angle in radians, including the ring's rotation.
    pub theta1: f64,
    /// End angle in radians, including the ring's rotation.
    pub theta2: f64,
}
