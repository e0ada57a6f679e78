//! Core data structures for the stardisk simulation.

pub mod record;
pub mod report;
