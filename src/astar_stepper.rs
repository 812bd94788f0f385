/// Bookkeeping for a single A* run that is advanced one expansion at a time. Structured like
/// [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html):
/// discovered cells live in an insertion-ordered map whose indices double as parent links, and the
/// open set is a binary heap from which outdated entries are skipped lazily.
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;

use crate::Coord;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

const NO_PARENT: usize = usize::MAX;

struct SmallestCostHolder {
    estimated_cost: usize,
    heuristic: usize,
    coord: Coord,
    cost: usize,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so every key is compared reversed. Lowest estimated cost first,
        // then the cell closest to the goal, then row-major position. The last two fields only
        // keep Ord consistent with Eq for stale duplicates of the same cell.
        other
            .estimated_cost
            .cmp(&self.estimated_cost)
            .then_with(|| other.heuristic.cmp(&self.heuristic))
            .then_with(|| other.coord.cmp(&self.coord))
            .then_with(|| other.cost.cmp(&self.cost))
            .then_with(|| other.index.cmp(&self.index))
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Node {
    pub parent: usize,
    pub cost: usize,
    pub heuristic: usize,
}

/// How [SearchContext::relax] changed the open set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Relaxed {
    Inserted,
    Improved,
    Unchanged,
}

#[derive(Default)]
pub(crate) struct SearchContext {
    to_see: BinaryHeap<SmallestCostHolder>,
    parents: FxIndexMap<Coord, Node>,
    closed: FxHashSet<Coord>,
}

impl SearchContext {
    pub fn new(start: Coord, heuristic: usize) -> SearchContext {
        let mut context = SearchContext::default();
        context.parents.insert(
            start,
            Node {
                parent: NO_PARENT,
                cost: 0,
                heuristic,
            },
        );
        context.to_see.push(SmallestCostHolder {
            estimated_cost: heuristic,
            heuristic,
            coord: start,
            cost: 0,
            index: 0,
        });
        context
    }

    /// Removes the best open cell, returning its index and cost.
    pub fn pop(&mut self) -> Option<(usize, Coord, usize)> {
        while let Some(SmallestCostHolder {
            coord, cost, index, ..
        }) = self.to_see.pop()
        {
            // A cell is pushed again whenever a cheaper way to it is found. Only the entry
            // carrying the current best cost is live.
            if self.closed.contains(&coord) {
                continue;
            }
            match self.parents.get_index(index) {
                Some((_, node)) if node.cost == cost => return Some((index, coord, cost)),
                _ => continue,
            }
        }
        None
    }

    pub fn close(&mut self, coord: Coord) {
        self.closed.insert(coord);
    }

    pub fn is_closed(&self, coord: &Coord) -> bool {
        self.closed.contains(coord)
    }

    /// Offers a path of length `new_cost` to `successor` through the cell at `parent`. The
    /// heuristic is only evaluated when the offer is accepted.
    pub fn relax<FH>(
        &mut self,
        successor: Coord,
        new_cost: usize,
        parent: usize,
        heuristic: FH,
    ) -> Relaxed
    where
        FH: FnOnce(&Coord) -> usize,
    {
        let h;
        let n;
        let relaxed;
        match self.parents.entry(successor) {
            Vacant(e) => {
                h = heuristic(e.key());
                n = e.index();
                e.insert(Node {
                    parent,
                    cost: new_cost,
                    heuristic: h,
                });
                relaxed = Relaxed::Inserted;
            }
            Occupied(mut e) => {
                if e.get().cost > new_cost {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert(Node {
                        parent,
                        cost: new_cost,
                        heuristic: h,
                    });
                    relaxed = Relaxed::Improved;
                } else {
                    return Relaxed::Unchanged;
                }
            }
        }
        self.to_see.push(SmallestCostHolder {
            estimated_cost: new_cost + h,
            heuristic: h,
            coord: successor,
            cost: new_cost,
            index: n,
        });
        relaxed
    }

    /// Follows parent links from the cell at `index` back to the start and returns the path in
    /// start-to-goal order.
    pub fn reverse_path(&self, index: usize) -> Vec<Coord> {
        let mut path: Vec<Coord> = std::iter::successors(self.parents.get_index(index), |(_, node)| {
            self.parents.get_index(node.parent)
        })
        .map(|(coord, _)| *coord)
        .collect();
        path.reverse();
        path
    }

    pub fn node(&self, coord: &Coord) -> Option<&Node> {
        self.parents.get(coord)
    }

    /// Number of discovered cells that have not been expanded yet.
    pub fn open_len(&self) -> usize {
        self.parents.len() - self.closed.len()
    }
}
