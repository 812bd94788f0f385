use std::collections::VecDeque;

use log::{debug, info};

use crate::astar_stepper::{Relaxed, SearchContext};
use crate::error::ConfigurationError;
use crate::pathing_grid::PathingGrid;
use crate::solver::cancel::CancelToken;
use crate::solver::{SearchEvent, SearchResult, SearchStep};
use crate::Coord;

/// Costs of a discovered cell during a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellCosts {
    /// Steps from the start along the best path found so far.
    pub g: usize,
    /// Manhattan distance to the goal.
    pub h: usize,
    pub f: usize,
}

enum State {
    Running,
    /// The outcome is known but buffered events still have to be handed out.
    Finishing(SearchResult),
    Done(SearchResult),
}

/// A* search over a [PathingGrid] that is driven one [SearchEvent] at a time, either through
/// [step](Self::step) or as an [Iterator].
///
/// The open set is ordered by f-cost, ties going to the lower h-cost and then to the lower
/// `(row, col)`, so repeated searches over the same grid produce identical event sequences.
/// Holding a shared borrow of the grid for the whole search means the grid cannot be edited
/// while a search is in flight.
pub struct AstarSearch<'a> {
    grid: &'a PathingGrid,
    start: Coord,
    goal: Coord,
    context: SearchContext,
    pending: VecDeque<SearchEvent>,
    state: State,
    cancel: CancelToken,
    expanded: usize,
}

impl<'a> AstarSearch<'a> {
    /// Searches from the grid's start to its goal.
    pub fn new(grid: &'a PathingGrid) -> AstarSearch<'a> {
        AstarSearch::between(grid, grid.start(), grid.goal())
    }

    /// Searches between arbitrary cells of `grid`, which may coincide. An endpoint on an obstacle
    /// makes the goal unreachable.
    pub fn with_endpoints(
        grid: &'a PathingGrid,
        start: Coord,
        goal: Coord,
    ) -> Result<AstarSearch<'a>, ConfigurationError> {
        for coord in [start, goal] {
            if !grid.in_bounds(coord) {
                return Err(ConfigurationError::OutOfBounds {
                    coord,
                    rows: grid.rows(),
                    cols: grid.cols(),
                });
            }
        }
        Ok(AstarSearch::between(grid, start, goal))
    }

    fn between(grid: &'a PathingGrid, start: Coord, goal: Coord) -> AstarSearch<'a> {
        debug!(
            "Searching from {} to {} on a {}x{} grid",
            start,
            goal,
            grid.rows(),
            grid.cols()
        );
        let state = if grid.is_obstacle(start) || grid.is_obstacle(goal) {
            State::Done(SearchResult::Unreachable)
        } else if start == goal {
            State::Done(SearchResult::Found {
                path: vec![start],
                total_steps: 0,
            })
        } else {
            State::Running
        };
        let context = match state {
            State::Running => SearchContext::new(start, start.manhattan_distance(&goal)),
            _ => SearchContext::default(),
        };
        AstarSearch {
            grid,
            start,
            goal,
            context,
            pending: VecDeque::new(),
            state,
            cancel: CancelToken::new(),
            expanded: 0,
        }
    }

    /// Uses `token` instead of the search's own stop flag.
    pub fn with_cancel_token(mut self, token: CancelToken) -> AstarSearch<'a> {
        self.cancel = token;
        self
    }

    /// A handle that stops this search when cancelled.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Produces the next event, or the final result once the search is over. The stop flag is
    /// checked first, so no event follows a cancellation. After the search is over every call
    /// returns the same result.
    pub fn step(&mut self) -> SearchStep {
        if let State::Done(result) = &self.state {
            return SearchStep::Done(result.clone());
        }
        if self.cancel.is_cancelled() {
            return self.terminate(SearchResult::Cancelled);
        }
        if let Some(event) = self.pending.pop_front() {
            return SearchStep::Event(event);
        }
        if let State::Finishing(result) = std::mem::replace(&mut self.state, State::Running) {
            return self.terminate(result);
        }
        loop {
            if self.cancel.is_cancelled() {
                return self.terminate(SearchResult::Cancelled);
            }
            let Some((index, current, cost)) = self.context.pop() else {
                return self.terminate(SearchResult::Unreachable);
            };
            if current == self.goal {
                let path = self.context.reverse_path(index);
                self.pending.extend(
                    path.iter()
                        .enumerate()
                        .map(|(index, &coord)| SearchEvent::PathStep { coord, index }),
                );
                self.state = State::Finishing(SearchResult::Found {
                    path,
                    total_steps: cost,
                });
            } else {
                self.expand(index, current, cost);
            }
            if let Some(event) = self.pending.pop_front() {
                return SearchStep::Event(event);
            }
        }
    }

    fn expand(&mut self, index: usize, current: Coord, cost: usize) {
        self.context.close(current);
        self.expanded += 1;
        if current != self.start {
            self.pending.push_back(SearchEvent::Visited(current));
        }
        let goal = self.goal;
        for neighbor in self.grid.neighbors(current) {
            if self.grid.is_obstacle(neighbor) || self.context.is_closed(&neighbor) {
                continue;
            }
            let relaxed = self
                .context
                .relax(neighbor, cost + 1, index, |n| n.manhattan_distance(&goal));
            if relaxed == Relaxed::Inserted && neighbor != self.start && neighbor != self.goal {
                self.pending.push_back(SearchEvent::Frontier(neighbor));
            }
        }
    }

    fn terminate(&mut self, result: SearchResult) -> SearchStep {
        self.context = SearchContext::default();
        self.pending.clear();
        match &result {
            SearchResult::Found { total_steps, .. } => info!(
                "Path of {} steps from {} to {} after {} expansions",
                total_steps, self.start, self.goal, self.expanded
            ),
            SearchResult::Unreachable => info!(
                "{} is not reachable from {} ({} expansions)",
                self.goal, self.start, self.expanded
            ),
            SearchResult::Cancelled => info!("Search cancelled after {} expansions", self.expanded),
        }
        self.state = State::Done(result.clone());
        SearchStep::Done(result)
    }

    /// The final result, once [step](Self::step) has returned it.
    pub fn result(&self) -> Option<&SearchResult> {
        match &self.state {
            State::Done(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Done(_))
    }

    /// Steps until the search is over, discarding the remaining events.
    pub fn finish(&mut self) -> SearchResult {
        loop {
            if let SearchStep::Done(result) = self.step() {
                return result;
            }
        }
    }

    /// Runs the search to the end, collecting every event.
    pub fn run(mut self) -> (Vec<SearchEvent>, SearchResult) {
        let events: Vec<SearchEvent> = self.by_ref().collect();
        let result = self.finish();
        (events, result)
    }

    /// Costs of a cell discovered by the running search. Scratch state is released when the
    /// search ends, after which this returns [None].
    pub fn costs(&self, coord: Coord) -> Option<CellCosts> {
        self.context.node(&coord).map(|node| CellCosts {
            g: node.cost,
            h: node.heuristic,
            f: node.cost + node.heuristic,
        })
    }

    /// Number of cells expanded so far.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Number of discovered cells still waiting to be expanded.
    pub fn open_len(&self) -> usize {
        self.context.open_len()
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn goal(&self) -> Coord {
        self.goal
    }
}

impl Iterator for AstarSearch<'_> {
    type Item = SearchEvent;

    fn next(&mut self) -> Option<SearchEvent> {
        match self.step() {
            SearchStep::Event(event) => Some(event),
            SearchStep::Done(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(path: &[(usize, usize)]) -> Vec<Coord> {
        path.iter().map(|&c| Coord::from(c)).collect()
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let grid = PathingGrid::new(2, 2, Coord::new(0, 0), Coord::new(1, 1)).unwrap();
        let search = AstarSearch::with_endpoints(&grid, Coord::new(1, 0), Coord::new(1, 0)).unwrap();
        let (events, result) = search.run();
        assert!(events.is_empty());
        assert_eq!(
            result,
            SearchResult::Found {
                path: vec![Coord::new(1, 0)],
                total_steps: 0
            }
        );
    }

    #[test]
    fn out_of_bounds_endpoints_are_rejected() {
        let grid = PathingGrid::new(2, 2, Coord::new(0, 0), Coord::new(1, 1)).unwrap();
        assert!(matches!(
            AstarSearch::with_endpoints(&grid, Coord::new(0, 0), Coord::new(0, 2)),
            Err(ConfigurationError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn endpoint_on_obstacle_is_unreachable() {
        let mut grid = PathingGrid::new(2, 3, Coord::new(0, 0), Coord::new(0, 2)).unwrap();
        grid.toggle_obstacle(Coord::new(1, 1)).unwrap();
        let mut search =
            AstarSearch::with_endpoints(&grid, Coord::new(0, 0), Coord::new(1, 1)).unwrap();
        assert_eq!(search.step(), SearchStep::Done(SearchResult::Unreachable));
    }

    /// Checks the exact event sequence on
    ///  ___
    /// |S.G|
    ///  ___
    #[test]
    fn straight_corridor_events() {
        let grid = PathingGrid::new(1, 3, Coord::new(0, 0), Coord::new(0, 2)).unwrap();
        let (events, result) = AstarSearch::new(&grid).run();
        assert_eq!(
            events,
            vec![
                SearchEvent::Frontier(Coord::new(0, 1)),
                SearchEvent::Visited(Coord::new(0, 1)),
                SearchEvent::PathStep {
                    coord: Coord::new(0, 0),
                    index: 0
                },
                SearchEvent::PathStep {
                    coord: Coord::new(0, 1),
                    index: 1
                },
                SearchEvent::PathStep {
                    coord: Coord::new(0, 2),
                    index: 2
                },
            ]
        );
        assert_eq!(result.path(), Some(&coords(&[(0, 0), (0, 1), (0, 2)])[..]));
    }

    /// Asserts that the optimal 4 step detour around a central obstacle is found.
    #[test]
    fn solve_simple_problem() {
        // |S..|
        // |.#.|
        // |..G|
        let mut grid = PathingGrid::new(3, 3, Coord::new(0, 0), Coord::new(2, 2)).unwrap();
        grid.toggle_obstacle(Coord::new(1, 1)).unwrap();
        let result = AstarSearch::new(&grid).finish();
        assert_eq!(result.total_steps(), Some(4));
        // Right is offered first, and (0, 1) wins the row-major tie against (1, 0).
        assert_eq!(
            result.path(),
            Some(&coords(&[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)])[..])
        );
    }

    #[test]
    fn costs_are_visible_while_running() {
        let grid = PathingGrid::new(3, 3, Coord::new(1, 0), Coord::new(1, 2)).unwrap();
        let mut search = AstarSearch::new(&grid);
        assert_eq!(
            search.costs(Coord::new(1, 0)),
            Some(CellCosts { g: 0, h: 2, f: 2 })
        );
        assert_eq!(
            search.step(),
            SearchStep::Event(SearchEvent::Frontier(Coord::new(1, 1)))
        );
        assert_eq!(
            search.costs(Coord::new(0, 0)),
            Some(CellCosts { g: 1, h: 3, f: 4 })
        );
        assert_eq!(search.expanded(), 1);
        // (1, 1), (2, 0), (0, 0) are open; the goal is not discovered yet
        assert_eq!(search.open_len(), 3);
        search.finish();
        assert_eq!(search.costs(Coord::new(1, 0)), None);
        assert_eq!(search.open_len(), 0);
    }

    #[test]
    fn done_is_sticky() {
        let mut grid = PathingGrid::new(1, 3, Coord::new(0, 0), Coord::new(0, 2)).unwrap();
        grid.toggle_obstacle(Coord::new(0, 1)).unwrap();
        let mut search = AstarSearch::new(&grid);
        assert_eq!(search.step(), SearchStep::Done(SearchResult::Unreachable));
        assert!(search.is_finished());
        assert_eq!(search.step(), SearchStep::Done(SearchResult::Unreachable));
        search.cancel();
        assert_eq!(search.result(), Some(&SearchResult::Unreachable));
        assert_eq!(search.next(), None);
    }

    #[test]
    fn cancel_discards_buffered_events() {
        let grid = PathingGrid::new(5, 5, Coord::new(2, 2), Coord::new(4, 4)).unwrap();
        let mut search = AstarSearch::new(&grid);
        // Expanding the start opens four cells at once.
        assert!(matches!(search.step(), SearchStep::Event(SearchEvent::Frontier(_))));
        search.cancel_token().cancel();
        assert_eq!(search.step(), SearchStep::Done(SearchResult::Cancelled));
        assert_eq!(search.next(), None);
        assert_eq!(search.open_len(), 0);
    }
}
