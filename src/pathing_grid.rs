use crate::config::GridConfig;
use crate::error::ConfigurationError;
use crate::solver::SearchEvent;
use crate::{Coord, N_SMALLVEC_SIZE};
use core::fmt;
use log::debug;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Persistent role of a cell. Only changed by editing, never by a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    #[default]
    Empty,
    Obstacle,
    Start,
    Goal,
}

/// Transient display marking written while a search is being replayed onto the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Overlay {
    #[default]
    Clear,
    Frontier,
    Visited,
    Path,
}

/// [PathingGrid] holds the [Role] of every cell of a `rows` x `cols` grid together with the
/// display [Overlay] a caller builds up from [SearchEvent]s. It guarantees that exactly one cell
/// is the start and exactly one (different) cell is the goal.
///
/// In addition it maintains connected components of the free cells using a [UnionFind]
/// structure, so that reachability can be queried without running a search.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    rows: usize,
    cols: usize,
    roles: Vec<Role>,
    overlays: Vec<Overlay>,
    start: Coord,
    goal: Coord,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl PathingGrid {
    /// Creates an empty grid with the given endpoints. Fails if the grid has no cells, if an
    /// endpoint lies outside of it or if both endpoints are the same cell.
    pub fn new(
        rows: usize,
        cols: usize,
        start: Coord,
        goal: Coord,
    ) -> Result<PathingGrid, ConfigurationError> {
        if rows == 0 || cols == 0 {
            return Err(ConfigurationError::EmptyGrid { rows, cols });
        }
        for coord in [start, goal] {
            if coord.row >= rows || coord.col >= cols {
                return Err(ConfigurationError::OutOfBounds { coord, rows, cols });
            }
        }
        if start == goal {
            return Err(ConfigurationError::CoincidentEndpoints(start));
        }
        let mut grid = PathingGrid {
            rows,
            cols,
            roles: vec![Role::Empty; rows * cols],
            overlays: vec![Overlay::Clear; rows * cols],
            start,
            goal,
            components: UnionFind::new(rows * cols),
            components_dirty: false,
        };
        grid.roles[start.row * cols + start.col] = Role::Start;
        grid.roles[goal.row * cols + goal.col] = Role::Goal;
        grid.generate_components();
        Ok(grid)
    }

    pub fn from_config(config: &GridConfig) -> Result<PathingGrid, ConfigurationError> {
        PathingGrid::new(config.rows, config.cols, config.start, config.goal)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn start(&self) -> Coord {
        self.start
    }
    pub fn goal(&self) -> Coord {
        self.goal
    }
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }
    fn index(&self, coord: Coord) -> Option<usize> {
        self.in_bounds(coord)
            .then(|| coord.row * self.cols + coord.col)
    }
    fn checked_index(&self, coord: Coord) -> Result<usize, ConfigurationError> {
        self.index(coord).ok_or(ConfigurationError::OutOfBounds {
            coord,
            rows: self.rows,
            cols: self.cols,
        })
    }
    fn coord(&self, ix: usize) -> Coord {
        Coord::new(ix / self.cols, ix % self.cols)
    }

    pub fn role(&self, coord: Coord) -> Option<Role> {
        self.index(coord).map(|ix| self.roles[ix])
    }
    pub fn overlay(&self, coord: Coord) -> Option<Overlay> {
        self.index(coord).map(|ix| self.overlays[ix])
    }
    /// Out of bounds cells are not obstacles, they simply do not exist.
    pub fn is_obstacle(&self, coord: Coord) -> bool {
        self.role(coord) == Some(Role::Obstacle)
    }
    /// All obstacle cells in row-major order.
    pub fn obstacles(&self) -> impl Iterator<Item = Coord> + '_ {
        self.roles
            .iter()
            .enumerate()
            .filter(|(_, role)| **role == Role::Obstacle)
            .map(|(ix, _)| self.coord(ix))
    }

    /// Orthogonal in-bounds neighbours in the fixed order right, left, down, up. The order
    /// determines which of several equally good cells enters the open set first.
    pub fn neighbors(&self, coord: Coord) -> SmallVec<[Coord; N_SMALLVEC_SIZE]> {
        let mut neighbors = SmallVec::new();
        if coord.col + 1 < self.cols {
            neighbors.push(Coord::new(coord.row, coord.col + 1));
        }
        if coord.col > 0 {
            neighbors.push(Coord::new(coord.row, coord.col - 1));
        }
        if coord.row + 1 < self.rows {
            neighbors.push(Coord::new(coord.row + 1, coord.col));
        }
        if coord.row > 0 {
            neighbors.push(Coord::new(coord.row - 1, coord.col));
        }
        neighbors
    }

    /// Assigns `role` to the cell at `coord`. Assigning [Role::Start] or [Role::Goal] moves the
    /// marker: the previous holder becomes empty. A start or goal cell is never overwritten, in
    /// which case `Ok(false)` is returned and nothing changes.
    pub fn set_cell_role(&mut self, coord: Coord, role: Role) -> Result<bool, ConfigurationError> {
        let ix = self.checked_index(coord)?;
        let current = self.roles[ix];
        if matches!(current, Role::Start | Role::Goal) {
            debug!("Ignoring {:?} on {} which holds {:?}", role, coord, current);
            return Ok(false);
        }
        if current == role {
            return Ok(false);
        }
        match role {
            Role::Start => {
                let old = self.start;
                self.roles[old.row * self.cols + old.col] = Role::Empty;
                self.start = coord;
            }
            Role::Goal => {
                let old = self.goal;
                self.roles[old.row * self.cols + old.col] = Role::Empty;
                self.goal = coord;
            }
            Role::Empty | Role::Obstacle => {}
        }
        self.set_role_at(ix, role);
        Ok(true)
    }

    /// Flips an empty cell to an obstacle and back. Start and goal cells are left alone.
    pub fn toggle_obstacle(&mut self, coord: Coord) -> Result<bool, ConfigurationError> {
        let ix = self.checked_index(coord)?;
        match self.roles[ix] {
            Role::Empty => self.set_role_at(ix, Role::Obstacle),
            Role::Obstacle => self.set_role_at(ix, Role::Empty),
            role => {
                debug!("Not toggling {} which holds {:?}", coord, role);
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Marks (or clears, if `blocked` is false) the rectangle with top-left corner `(top, left)`.
    /// The rectangle is clipped to the grid and start and goal cells are skipped.
    pub fn set_rect(&mut self, top: usize, left: usize, height: usize, width: usize, blocked: bool) {
        let role = if blocked { Role::Obstacle } else { Role::Empty };
        for row in top..(top + height).min(self.rows) {
            for col in left..(left + width).min(self.cols) {
                let ix = row * self.cols + col;
                if self.roles[ix] != role && !matches!(self.roles[ix], Role::Start | Role::Goal) {
                    self.set_role_at(ix, role);
                }
            }
        }
    }

    /// Removes every obstacle, keeping start and goal in place.
    pub fn clear_obstacles(&mut self) {
        for role in self.roles.iter_mut() {
            if *role == Role::Obstacle {
                *role = Role::Empty;
            }
        }
        self.generate_components();
    }

    /// Resets all search overlays; roles are untouched.
    pub fn clear_search_state(&mut self) {
        self.overlays.fill(Overlay::Clear);
    }

    /// Replays a single search event onto the overlays. Start and goal keep their own look, and
    /// path markings take precedence over earlier frontier or visited markings.
    pub fn apply_event(&mut self, event: &SearchEvent) {
        let (coord, overlay) = match *event {
            SearchEvent::Frontier(coord) => (coord, Overlay::Frontier),
            SearchEvent::Visited(coord) => (coord, Overlay::Visited),
            SearchEvent::PathStep { coord, .. } => (coord, Overlay::Path),
        };
        if let Some(ix) = self.index(coord) {
            if !matches!(self.roles[ix], Role::Start | Role::Goal) {
                self.overlays[ix] = overlay;
            }
        }
    }

    /// Writes a role and keeps the components up to date. Freeing a cell joins it with its free
    /// neighbours, blocking one may split a component so the components are flagged as dirty.
    fn set_role_at(&mut self, ix: usize, role: Role) {
        let was_blocked = self.roles[ix] == Role::Obstacle;
        let blocked = role == Role::Obstacle;
        self.roles[ix] = role;
        if blocked && !was_blocked {
            self.components_dirty = true;
        } else if was_blocked && !blocked {
            let coord = self.coord(ix);
            for n in self.neighbors(coord) {
                let n_ix = n.row * self.cols + n.col;
                if self.roles[n_ix] != Role::Obstacle {
                    self.components.union(ix, n_ix);
                }
            }
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            debug!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up free grid neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.rows * self.cols);
        self.components_dirty = false;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let ix = row * self.cols + col;
                if self.roles[ix] == Role::Obstacle {
                    continue;
                }
                // Right and down suffice, the other two directions are covered by the neighbour.
                if col + 1 < self.cols && self.roles[ix + 1] != Role::Obstacle {
                    self.components.union(ix, ix + 1);
                }
                if row + 1 < self.rows && self.roles[ix + self.cols] != Role::Obstacle {
                    self.components.union(ix, ix + self.cols);
                }
            }
        }
    }

    /// Checks if `a` and `b` are free cells on the same connected component.
    pub fn reachable(&mut self, a: Coord, b: Coord) -> bool {
        self.update();
        match (self.index(a), self.index(b)) {
            (Some(a_ix), Some(b_ix)) => {
                self.roles[a_ix] != Role::Obstacle
                    && self.roles[b_ix] != Role::Obstacle
                    && self.components.equiv(a_ix, b_ix)
            }
            _ => false,
        }
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let ix = row * self.cols + col;
                let c = match (self.roles[ix], self.overlays[ix]) {
                    (Role::Start, _) => 'S',
                    (Role::Goal, _) => 'G',
                    (Role::Obstacle, _) => '#',
                    (Role::Empty, Overlay::Path) => '*',
                    (Role::Empty, Overlay::Visited) => 'x',
                    (Role::Empty, Overlay::Frontier) => 'o',
                    (Role::Empty, Overlay::Clear) => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
