use serde::{Deserialize, Serialize};

/// Aggregate view over a cluster analysis pass.
///
/// Singleton entries (cells that are their own cluster) are excluded from
/// every field except `total_bonds`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ClusterSummary {
    /// Universe entries belonging to a cluster of size > 1.
    pub clustered_cells: usize,
    /// Distinct clusters of size > 1.
    pub cluster_count: usize,
    /// Mean cluster size over the clustered entries (each entry weighs once).
    pub mean_cluster_size: f64,
    pub largest_cluster: usize,
    pub total_bonds: u64,
}

/// Outcome of a headless run.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Hash of the model parameters, see `SimConfig::fingerprint`.
    pub fingerprint: String,
    pub seed: Option<u64>,
    pub ticks: usize,
    pub paused: bool,
    pub total_cells: usize,
    pub history_len: usize,
    /// Newly ignited cells per tick.
    pub star_formation_rate: Vec<usize>,
    pub mean_star_formation_rate: f64,
    pub final_active_cells: usize,
    pub clusters: ClusterSummary,
}
