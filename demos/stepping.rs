use stepwise_astar::{AstarSearch, GridConfig, PathingGrid, SearchStep};

// Replays a search on the default 15x20 layout one event at a time, printing the grid every time
// a cell is expanded. A wall across the middle forces a detour.

fn main() {
    let mut pathing_grid = PathingGrid::from_config(&GridConfig::default()).unwrap();
    pathing_grid.set_rect(2, 10, 11, 1, true);

    let mut display = pathing_grid.clone();
    let mut search = AstarSearch::new(&pathing_grid);
    let result = loop {
        match search.step() {
            SearchStep::Event(event) => {
                display.apply_event(&event);
                if matches!(event, stepwise_astar::SearchEvent::Visited(_)) {
                    println!("{}", display);
                }
            }
            SearchStep::Done(result) => break result,
        }
    };
    println!("{}", display);
    println!("{:?} after {} expansions", result.total_steps(), search.expanded());
}
