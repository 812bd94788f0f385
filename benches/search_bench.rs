use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;
use stepwise_astar::{solver::find_path, AstarSearch, Coord, PathingGrid};

fn random_grid(rows: usize, cols: usize, density: f64, rng: &mut StdRng) -> PathingGrid {
    let mut grid = PathingGrid::new(rows, cols, Coord::new(0, 0), Coord::new(rows - 1, cols - 1))
        .unwrap();
    for row in 0..rows {
        for col in 0..cols {
            if rng.gen_bool(density) {
                grid.toggle_obstacle(Coord::new(row, col)).unwrap();
            }
        }
    }
    grid
}

fn random_bench(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    for (rows, cols) in [(15, 20), (64, 64), (256, 256)] {
        let grids: Vec<PathingGrid> = (0..20)
            .map(|_| random_grid(rows, cols, 0.25, &mut rng))
            .collect();
        c.bench_function(format!("find_path {rows}x{cols}").as_str(), |b| {
            b.iter(|| {
                for grid in &grids {
                    black_box(find_path(grid));
                }
            })
        });
        c.bench_function(format!("stepped events {rows}x{cols}").as_str(), |b| {
            b.iter(|| {
                for grid in &grids {
                    black_box(AstarSearch::new(grid).run());
                }
            })
        });
    }
}

criterion_group!(benches, random_bench);
criterion_main!(benches);
