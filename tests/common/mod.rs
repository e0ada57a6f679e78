use stardisk_core::automaton::StarFormation;
use stardisk_core::config::StarFormationConfig;
use stardisk_core::grid::Grid;
use stardisk_core::scheduler::Scheduler;

#[allow(dead_code)]
pub struct DiskBuilder {
    ring_count: usize,
    base_cells_per_ring: usize,
    params: StarFormationConfig,
    seed: u64,
    ages: Vec<(usize, usize, u32)>,
    initial_stars: usize,
}

#[allow(dead_code)]
impl DiskBuilder {
    pub fn new(ring_count: usize, base_cells_per_ring: usize) -> Self {
        Self {
            ring_count,
            base_cells_per_ring,
            params: StarFormationConfig::default(),
            seed: 0,
            ages: Vec::new(),
            initial_stars: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_params<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut StarFormationConfig),
    {
        modifier(&mut self.params);
        self
    }

    pub fn with_age(mut self, ring: usize, index: usize, age: u32) -> Self {
        self.ages.push((ring, index, age));
        self
    }

    pub fn with_initial_stars(mut self, count: usize) -> Self {
        self.initial_stars = count;
        self
    }

    pub fn build(self) -> (Grid, StarFormation) {
        let mut grid = Grid::new(self.ring_count, self.base_cells_per_ring)
            .expect("Failed to create grid in test builder");
        let mut engine = StarFormation::with_seed(self.params, self.seed)
            .expect("Failed to create engine in test builder");
        for (ring, index, age) in self.ages {
            grid.rings[ring].cells[index].current_age = age;
        }
        if self.initial_stars > 0 {
            engine
                .seed_initial_stars(&mut grid, self.initial_stars)
                .expect("Failed to seed initial stars");
        }
        (grid, engine)
    }

    pub fn build_scheduler(self) -> Scheduler {
        let (grid, engine) = self.build();
        Scheduler::new(grid, engine)
    }
}

/// Ages of every cell, ring by ring.
#[allow(dead_code)]
pub fn ages(grid: &Grid) -> Vec<u32> {
    grid.cells().map(|c| c.current_age).collect()
}
