//! Clustering of active cells with a flat union-find.
//!
//! The universe is indexed by cell `unique_id`, sized to the largest id plus
//! one. Ids are not dense and collide between rings, so some slots are never
//! touched and some are shared by several cells; both are kept as they are.

use crate::grid::Grid;
use stardisk_data::ClusterSummary;
use std::collections::HashSet;

/// Union-find over `0..len` with per-element bond counters.
#[derive(Debug, Clone)]
pub struct Clusters {
    parent: Vec<usize>,
    size: Vec<usize>,
    bonds: Vec<u32>,
}

impl Clusters {
    /// Every element starts as its own singleton cluster.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
            bonds: vec![0; len],
        }
    }

    /// Links every cell aged at least `min_age` with its qualifying neighbours.
    ///
    /// `len` must exceed every `unique_id` on the grid.
    pub fn from_grid(grid: &Grid, len: usize, min_age: u32) -> Self {
        let mut clusters = Self::new(len);
        for cell in grid.cells() {
            if cell.current_age < min_age {
                continue;
            }
            for neighbour in grid.get_neighbours(cell) {
                if neighbour.current_age >= min_age {
                    clusters.union(cell.unique_id, neighbour.unique_id);
                    clusters.count_bonds(cell.unique_id, neighbour.unique_id);
                }
            }
        }
        clusters
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of `x`'s cluster, compressing the path on the way.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merges the clusters of `a` and `b`, smaller into larger.
    ///
    /// Returns `false` when they already share a cluster.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        let (keep, absorb) = if self.size[root_a] >= self.size[root_b] {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent[absorb] = keep;
        self.size[keep] += self.size[absorb];
        true
    }

    /// Records one adjacency attempt between `a` and `b`.
    pub fn count_bonds(&mut self, a: usize, b: usize) {
        self.bonds[a] += 1;
        self.bonds[b] += 1;
    }

    pub fn bonds(&self) -> &[u32] {
        &self.bonds
    }

    /// Size of the cluster containing `x`.
    pub fn cluster_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }

    /// Resolves every element into its final cluster.
    pub fn into_analysis(mut self) -> ClusterAnalysis {
        let len = self.len();
        let mut cluster_id = Vec::with_capacity(len);
        let mut cluster_size = Vec::with_capacity(len);
        for x in 0..len {
            let root = self.find(x);
            cluster_id.push(root);
            cluster_size.push(self.size[root]);
        }
        ClusterAnalysis {
            cluster_id,
            cluster_size,
            bonds: self.bonds,
        }
    }
}

/// Per-`unique_id` result of a clustering pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAnalysis {
    /// Representative element of each entry's cluster.
    pub cluster_id: Vec<usize>,
    /// Cardinality of each entry's cluster.
    pub cluster_size: Vec<usize>,
    /// Adjacency attempts per entry.
    pub bonds: Vec<u32>,
}

impl ClusterAnalysis {
    pub fn len(&self) -> usize {
        self.cluster_size.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cluster_size.is_empty()
    }

    /// Aggregates the analysis, leaving singleton entries out.
    pub fn summary(&self) -> ClusterSummary {
        let clustered: Vec<usize> = (0..self.len())
            .filter(|&x| self.cluster_size[x] != 1)
            .collect();

        let clustered_cells = clustered.len();
        let mean_cluster_size = if clustered_cells > 0 {
            clustered.iter().map(|&x| self.cluster_size[x]).sum::<usize>() as f64
                / clustered_cells as f64
        } else {
            0.0
        };
        let cluster_count = clustered
            .iter()
            .map(|&x| self.cluster_id[x])
            .collect::<HashSet<_>>()
            .len();

        ClusterSummary {
            clustered_cells,
            cluster_count,
            mean_cluster_size,
            largest_cluster: clustered
                .iter()
                .map(|&x| self.cluster_size[x])
                .max()
                .unwrap_or(0),
            total_bonds: self.bonds.iter().map(|&b| u64::from(b)).sum(),
        }
    }
}

/// Partitions the cells aged at least `min_age` into connected clusters.
///
/// Reads the grid only. Entries are indexed by `unique_id`; cells below the
/// threshold and unused ids come out as singletons with no bonds.
pub fn analyze(grid: &Grid, min_age: u32) -> ClusterAnalysis {
    let len = grid.max_unique_id() + 1;
    let clusters = Clusters::from_grid(grid, len, min_age);
    tracing::debug!(universe = len, min_age, "Cluster analysis complete");
    clusters.into_analysis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_union_and_find() {
        let mut clusters = Clusters::new(5);
        assert!(clusters.union(0, 1));
        assert!(clusters.union(1, 2));
        assert!(!clusters.union(2, 0));
        assert_eq!(clusters.cluster_size(0), 3);
        assert_eq!(clusters.cluster_size(3), 1);
        assert_eq!(clusters.find(2), clusters.find(0));
        assert_ne!(clusters.find(3), clusters.find(4));
    }

    #[test]
    fn test_chain_and_isolated_cell() {
        let mut grid = Grid::new(1, 8).unwrap();
        for i in [0, 1, 2, 3, 5] {
            grid.rings[0].cells[i].current_age = 4;
        }
        let analysis = analyze(&grid, 1);
        assert_eq!(analysis.cluster_size, vec![4, 4, 4, 4, 1, 1, 1, 1]);
        assert_eq!(analysis.bonds, vec![2, 4, 4, 2, 0, 0, 0, 0]);

        let summary = analysis.summary();
        assert_eq!(summary.clustered_cells, 4);
        assert_eq!(summary.cluster_count, 1);
        assert_eq!(summary.largest_cluster, 4);
        assert!((summary.mean_cluster_size - 4.0).abs() < 1e-12);
        assert_eq!(summary.total_bonds, 12);
    }

    #[test]
    fn test_threshold_above_all_ages() {
        let mut grid = Grid::new(3, 2).unwrap();
        for cell in grid.rings.iter_mut().flat_map(|r| r.cells.iter_mut()) {
            cell.current_age = 5;
        }
        let analysis = analyze(&grid, 6);
        assert_eq!(analysis.len(), grid.max_unique_id() + 1);
        assert!(analysis.cluster_size.iter().all(|&s| s == 1));
        assert!(analysis.bonds.iter().all(|&b| b == 0));
        assert_eq!(analysis.summary(), ClusterSummary::default());
    }

    #[test]
    fn test_cluster_across_rings() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.rings[0].cells[0].current_age = 1;
        grid.rings[1].cells[1].current_age = 1;
        let analysis = analyze(&grid, 1);
        // ring 0 cell 0 has id 0, ring 1 cell 1 has id 3
        assert_eq!(analysis.cluster_size, vec![2, 1, 1, 2, 1, 1]);
        assert_eq!(analysis.bonds, vec![2, 0, 0, 2, 0, 0]);
        assert_eq!(analysis.cluster_id[0], analysis.cluster_id[3]);
    }

    #[test]
    fn test_wrapped_inner_window_counts_twice() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.rings[0].cells[0].current_age = 1;
        grid.rings[1].cells[0].current_age = 1;
        let analysis = analyze(&grid, 1);
        // one bond from ring 0 looking out, two from ring 1 looking in
        assert_eq!(analysis.bonds, vec![3, 0, 3, 0, 0, 0]);
        assert_eq!(analysis.cluster_size, vec![2, 1, 2, 1, 1, 1]);
    }

    #[test]
    fn test_bonds_count_attempts_not_merges() {
        let mut grid = Grid::new(1, 2).unwrap();
        grid.rings[0].cells[0].current_age = 2;
        grid.rings[0].cells[1].current_age = 2;
        let analysis = analyze(&grid, 1);
        assert_eq!(analysis.cluster_size, vec![2, 2]);
        // each cell sees the other as both left and right neighbour
        assert_eq!(analysis.bonds, vec![4, 4]);
    }

    #[test]
    fn test_min_age_filters_young_cells() {
        let mut grid = Grid::new(1, 6).unwrap();
        let ages = [5, 5, 1, 5, 0, 0];
        for (cell, age) in grid.rings[0].cells.iter_mut().zip(ages) {
            cell.current_age = age;
        }
        let analysis = analyze(&grid, 3);
        assert_eq!(analysis.cluster_size, vec![2, 2, 1, 1, 1, 1]);

        let analysis = analyze(&grid, 1);
        assert_eq!(analysis.cluster_size, vec![4, 4, 4, 4, 1, 1]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_unions_partition_the_universe(
            len in 1usize..64,
            pairs in proptest::collection::vec((0usize..64, 0usize..64), 0..80)
        ) {
            let mut clusters = Clusters::new(len);
            let pairs: Vec<(usize, usize)> =
                pairs.into_iter().map(|(a, b)| (a % len, b % len)).collect();
            for &(a, b) in &pairs {
                clusters.union(a, b);
            }
            for &(a, b) in &pairs {
                prop_assert_eq!(clusters.find(a), clusters.find(b));
            }

            let analysis = clusters.into_analysis();
            let mut members = std::collections::HashMap::new();
            for &root in &analysis.cluster_id {
                *members.entry(root).or_insert(0usize) += 1;
            }
            prop_assert_eq!(members.values().sum::<usize>(), len);
            for x in 0..len {
                prop_assert_eq!(analysis.cluster_size[x], members[&analysis.cluster_id[x]]);
            }
        }
    }
}
