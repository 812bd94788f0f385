use stepwise_astar::{solver::find_path, Coord, PathingGrid, SearchResult};

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have a 4-neighborhood

fn main() {
    let mut pathing_grid = PathingGrid::new(3, 3, Coord::new(0, 0), Coord::new(2, 2)).unwrap();
    pathing_grid.toggle_obstacle(Coord::new(1, 1)).unwrap();
    println!("{}", pathing_grid);
    match find_path(&pathing_grid) {
        SearchResult::Found { path, total_steps } => {
            println!("Path of {} steps:", total_steps);
            for p in path {
                println!("{}", p);
            }
        }
        other => println!("No path: {:?}", other),
    }
}
