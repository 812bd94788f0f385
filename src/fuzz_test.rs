/// Fuzzes the search by checking for many random grids that a path is found exactly when the goal
/// is on the same connected component as the start, and that found paths are as short as a
/// breadth-first search says they should be.
use super::*;
use rand::prelude::*;
use std::collections::VecDeque;

fn random_grid(n: usize, rng: &mut StdRng) -> PathingGrid {
    let mut grid = PathingGrid::new(n, n, Coord::new(0, 0), Coord::new(n - 1, n - 1)).unwrap();
    for row in 0..n {
        for col in 0..n {
            if rng.gen_bool(0.4) {
                grid.toggle_obstacle(Coord::new(row, col)).unwrap();
            }
        }
    }
    grid
}

/// Step distance from the grid's start to its goal, if any.
fn bfs_distance(grid: &PathingGrid) -> Option<usize> {
    let mut dist = vec![vec![None; grid.cols()]; grid.rows()];
    let mut queue = VecDeque::new();
    dist[grid.start().row][grid.start().col] = Some(0);
    queue.push_back(grid.start());
    while let Some(c) = queue.pop_front() {
        let d = dist[c.row][c.col]?;
        if c == grid.goal() {
            return Some(d);
        }
        for n in grid.neighbors(c) {
            if !grid.is_obstacle(n) && dist[n.row][n.col].is_none() {
                dist[n.row][n.col] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }
    None
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, &mut rng);
        let reachable = grid.reachable(grid.start(), grid.goal());
        let result = solver::find_path(&grid);
        // Show the grid if the answers disagree
        if result.is_found() != reachable {
            println!("{}", grid);
        }
        assert_eq!(result.is_found(), reachable);
        assert_eq!(result.total_steps(), bfs_distance(&grid));
        if let SearchResult::Found { path, total_steps } = &result {
            assert_eq!(path.len() - 1, *total_steps);
            assert!(is_valid_path(&grid, path, grid.start(), grid.goal()));
        }
    }
}
