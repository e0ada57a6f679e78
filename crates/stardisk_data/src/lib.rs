//! Plain data shared between the simulation core and its consumers.

pub mod data;

pub use data::record::CellRecord;
pub use data::report::{ClusterSummary, RunReport};
