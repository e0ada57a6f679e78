use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stardisk_core::automaton::StarFormation;
use stardisk_core::cluster;
use stardisk_core::config::StarFormationConfig;
use stardisk_core::grid::Grid;

fn populated_grid(ring_count: usize, base: usize, seed: u64) -> (Grid, StarFormation) {
    let mut grid = Grid::new(ring_count, base).unwrap();
    let mut engine = StarFormation::with_seed(StarFormationConfig::default(), seed).unwrap();
    let count = grid.total_cells() / 10;
    engine.seed_initial_stars(&mut grid, count).unwrap();
    (grid, engine)
}

fn bench_neighbours(c: &mut Criterion) {
    let (grid, _) = populated_grid(32, 6, 42);

    c.bench_function("neighbours_all_cells_32x6", |b| {
        b.iter(|| {
            let total: usize = grid.cells().map(|cell| grid.get_neighbours(cell).len()).sum();
            black_box(total)
        })
    });
}

fn bench_tick(c: &mut Criterion) {
    let (mut grid, mut engine) = populated_grid(32, 6, 42);

    c.bench_function("tick_32x6", |b| {
        b.iter(|| {
            let outcome = engine.tick(&mut grid);
            black_box(outcome)
        })
    });
}

fn bench_cluster_analysis(c: &mut Criterion) {
    let (mut grid, mut engine) = populated_grid(32, 6, 7);
    for _ in 0..20 {
        engine.tick(&mut grid);
    }

    c.bench_function("cluster_analysis_32x6", |b| {
        b.iter(|| {
            let analysis = cluster::analyze(black_box(&grid), 1);
            black_box(analysis)
        })
    });
}

criterion_group!(benches, bench_neighbours, bench_tick, bench_cluster_analysis);
criterion_main!(benches);
