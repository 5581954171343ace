//! Grid-based pathfinding using the A* algorithm.
//!
//! Searches the 27 x 21 battlefield with 8-directional movement at a
//! uniform step cost of 1. Living units are obstacles, except the attacker
//! and the target themselves. The heuristic is Manhattan distance to the
//! goal.
//!
//! An unreachable target is a normal outcome and yields an empty path.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::grid::{Edge, GridPos};
use crate::unit::UnitInstance;

/// Cells occupied by living units, keyed by [`GridPos::key`].
#[derive(Debug, Clone, Default)]
pub struct ObstacleMap {
    blocked: HashSet<u64>,
}

impl ObstacleMap {
    /// Derive obstacles from the units on the board.
    ///
    /// Every living unit blocks its cell, except on `start` and `goal`.
    pub fn from_units<'a, I>(units: I, start: GridPos, goal: GridPos) -> Self
    where
        I: IntoIterator<Item = &'a UnitInstance>,
    {
        let blocked = units
            .into_iter()
            .filter(|unit| unit.is_alive())
            .map(|unit| unit.position)
            .filter(|&pos| pos != start && pos != goal)
            .map(GridPos::key)
            .collect();
        Self { blocked }
    }

    /// Build an obstacle map from raw cells.
    pub fn from_cells<I: IntoIterator<Item = GridPos>>(cells: I) -> Self {
        Self {
            blocked: cells.into_iter().map(GridPos::key).collect(),
        }
    }

    /// Check if a cell is blocked.
    #[must_use]
    pub fn is_blocked(&self, pos: GridPos) -> bool {
        self.blocked.contains(&pos.key())
    }

    /// Number of blocked cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    /// True if nothing is blocked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }
}

/// A search node. Nodes live in an arena and point at their parent by
/// index, forming a tree rooted at the start cell.
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    pos: GridPos,
    g_score: u32,
    parent: Option<usize>,
}

/// An entry in the A* open set priority queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct OpenEntry {
    /// g_score + heuristic.
    f_score: u32,
    /// Insertion sequence. Earlier entries win ties.
    seq: u64,
    /// Arena index of the node.
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so we reverse the comparison for min-heap behavior.
        match other.f_score.cmp(&self.f_score) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            ord => ord,
        }
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[inline]
fn manhattan_heuristic(pos: GridPos, goal: GridPos) -> u32 {
    pos.manhattan_distance(goal)
}

/// Find a path from the attacker to the target.
///
/// Returns the cells from the attacker's position to the target's position
/// inclusive, or an empty vector if the target cannot be reached.
pub fn find_target_path<'a, I>(
    attacker: &UnitInstance,
    target: &UnitInstance,
    units: I,
) -> Vec<Edge>
where
    I: IntoIterator<Item = &'a UnitInstance>,
{
    let start = attacker.position;
    let goal = target.position;
    let obstacles = ObstacleMap::from_units(units, start, goal);
    find_path(&obstacles, start, goal)
}

/// A* search from `start` to `goal` around `obstacles`.
///
/// The goal is always enterable even if it is listed as blocked. Returns an
/// empty vector when either endpoint is off the battlefield or when the
/// frontier empties without reaching the goal.
pub fn find_path(obstacles: &ObstacleMap, start: GridPos, goal: GridPos) -> Vec<Edge> {
    if !start.in_field() || !goal.in_field() {
        tracing::debug!(%start, %goal, "Path endpoint outside battlefield");
        return Vec::new();
    }

    let mut arena: Vec<SearchNode> = Vec::new();
    let mut best: HashMap<u64, usize> = HashMap::new();
    let mut open_set: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut seq: u64 = 0;

    arena.push(SearchNode {
        pos: start,
        g_score: 0,
        parent: None,
    });
    best.insert(start.key(), 0);
    open_set.push(OpenEntry {
        f_score: manhattan_heuristic(start, goal),
        seq,
        node: 0,
    });

    while let Some(entry) = open_set.pop() {
        let current = arena[entry.node];

        // Goal reached
        if current.pos == goal {
            return reconstruct_path(&arena, entry.node);
        }

        // Superseded by a cheaper route to the same cell
        if best.get(&current.pos.key()) != Some(&entry.node) {
            continue;
        }

        for neighbor in current.pos.field_neighbors() {
            if neighbor != goal && obstacles.is_blocked(neighbor) {
                continue;
            }

            let tentative_g = current.g_score + 1;
            let key = neighbor.key();
            let improves = best
                .get(&key)
                .map_or(true, |&known| tentative_g < arena[known].g_score);

            if improves {
                let index = arena.len();
                arena.push(SearchNode {
                    pos: neighbor,
                    g_score: tentative_g,
                    parent: Some(entry.node),
                });
                best.insert(key, index);

                seq += 1;
                open_set.push(OpenEntry {
                    f_score: tentative_g + manhattan_heuristic(neighbor, goal),
                    seq,
                    node: index,
                });
            }
        }
    }

    tracing::debug!(%start, %goal, explored = arena.len(), "No path found");
    Vec::new()
}

/// Walk parent links from `goal_node` back to the root, then reverse.
fn reconstruct_path(arena: &[SearchNode], goal_node: usize) -> Vec<Edge> {
    let mut path = Vec::new();
    let mut current = Some(goal_node);

    while let Some(index) = current {
        let node = &arena[index];
        path.push(node.pos);
        current = node.parent;
    }

    path.reverse();
    path
}
