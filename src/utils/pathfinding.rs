//! # Pathfinding Algorithms
//!
//! Breadth-first nearest-floor search and A* shortest paths over a [`Grid`].
//!
//! Both searches expand neighbors in the right, left, up, down order of
//! [`Grid::neighbors4`]. A* breaks priority ties by insertion
//! order, which makes the shape of a path on symmetric terrain reproducible.

use crate::{Grid, Position, TerrainKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

/// An ordered route from start to goal, both inclusive.
///
/// An empty path means no route exists; that is an expected answer, not an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path(Vec<Position>);

impl Path {
    /// The "no route" answer.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of positions, including start and goal.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Number of moves needed to walk the path.
    pub fn steps(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Position> {
        self.0.first().copied()
    }

    pub fn goal(&self) -> Option<Position> {
        self.0.last().copied()
    }

    pub fn positions(&self) -> &[Position] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<Position> {
        self.0.get(index).copied()
    }
}

impl From<Vec<Position>> for Path {
    fn from(positions: Vec<Position>) -> Self {
        Self(positions)
    }
}

/// Tuning knobs for [`find_path_with`].
#[derive(Debug, Clone, Copy)]
pub struct PathOptions {
    /// Let the goal count as reachable even when someone stands on it.
    pub allow_occupied_goal: bool,
    /// Give up (returning an empty path) after this many frontier pops.
    pub max_expansions: Option<usize>,
    /// Cost of stepping onto a cell of the given terrain. Must be at least 1
    /// to keep the Manhattan heuristic admissible.
    pub step_cost: fn(TerrainKind) -> u32,
}

impl PathOptions {
    /// Options for chasing a target that occupies the goal cell.
    pub fn chase() -> Self {
        Self {
            allow_occupied_goal: true,
            ..Self::default()
        }
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            allow_occupied_goal: false,
            max_expansions: None,
            step_cost: uniform_cost,
        }
    }
}

/// Every step costs one.
pub fn uniform_cost(_terrain: TerrainKind) -> u32 {
    1
}

/// Finds the floor kind nearest to `start` by breadth-first search.
///
/// Used to decide what lies under a spawn marker. The start cell itself is
/// never inspected. Cells in `pending` are markers that have not been
/// resolved yet: the search walks through them but never answers with their
/// placeholder terrain. Returns [`TerrainKind::DirtFloor`] when no floor is
/// reachable.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use wayfarer::{parse, resolve_pending, Position, TerrainKind};
///
/// let level = parse("#####\n#~ $#\n#####\n").unwrap();
/// let none = HashSet::new();
/// assert_eq!(resolve_pending(&level.grid, Position::new(2, 1), &none), TerrainKind::Sand);
/// // Nothing walkable around the water: fall back to dirt.
/// assert_eq!(resolve_pending(&level.grid, Position::new(1, 1), &none), TerrainKind::DirtFloor);
/// ```
pub fn resolve_pending(grid: &Grid, start: Position, pending: &HashSet<Position>) -> TerrainKind {
    let mut frontier = VecDeque::new();
    let mut visited = HashSet::new();
    frontier.push_back(start);
    visited.insert(start);

    while let Some(current) = frontier.pop_front() {
        for next in current.cardinal_adjacent_positions() {
            let unresolved = pending.contains(&next);
            if !(unresolved || grid.can_walk(next)) || !visited.insert(next) {
                continue;
            }
            match grid.terrain(next) {
                Some(terrain) if !unresolved && terrain.is_floor() => return terrain,
                _ => frontier.push_back(next),
            }
        }
    }

    TerrainKind::DirtFloor
}

/// Finds a shortest orthogonal path from `start` to `goal`.
///
/// The goal must be walkable: an occupied goal is unreachable. Use
/// [`find_path_with`] and [`PathOptions::chase`] to path onto an occupant.
///
/// # Examples
///
/// ```
/// use wayfarer::{find_path, Grid, Position, TerrainKind};
///
/// let grid = Grid::walled(5, 5, TerrainKind::DirtFloor);
/// let path = find_path(&grid, Position::new(1, 1), Position::new(3, 3));
/// assert_eq!(path.steps(), 4);
/// assert_eq!(path.start(), Some(Position::new(1, 1)));
/// assert_eq!(path.goal(), Some(Position::new(3, 3)));
/// ```
pub fn find_path(grid: &Grid, start: Position, goal: Position) -> Path {
    find_path_with(grid, start, goal, &PathOptions::default())
}

/// A* search with explicit [`PathOptions`].
pub fn find_path_with(grid: &Grid, start: Position, goal: Position, options: &PathOptions) -> Path {
    if start == goal {
        return Path::from(vec![start]);
    }

    let mut frontier = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut cost_so_far: HashMap<Position, u32> = HashMap::new();
    let mut sequence: u64 = 0;
    let mut expansions: usize = 0;

    frontier.push(AStarNode {
        position: start,
        priority: 0,
        sequence,
    });
    cost_so_far.insert(start, 0);

    while let Some(current) = frontier.pop() {
        if current.position == goal {
            let path = reconstruct_path(&came_from, start, goal);
            log::debug!(
                "Path {} -> {}: {} steps, {} expansions",
                start,
                goal,
                path.steps(),
                expansions
            );
            return path;
        }

        expansions += 1;
        if let Some(limit) = options.max_expansions {
            if expansions > limit {
                log::debug!("Path {} -> {} abandoned after {} expansions", start, goal, limit);
                return Path::none();
            }
        }

        let current_cost = cost_so_far.get(&current.position).copied().unwrap_or(0);
        for next in expand(grid, current.position, goal, options) {
            let terrain = grid.terrain(next).unwrap_or(TerrainKind::Blank);
            let new_cost = current_cost + (options.step_cost)(terrain);
            let improved = cost_so_far
                .get(&next)
                .map_or(true, |&known| new_cost < known);
            if improved {
                cost_so_far.insert(next, new_cost);
                came_from.insert(next, current.position);
                sequence += 1;
                frontier.push(AStarNode {
                    position: next,
                    priority: new_cost + next.manhattan_distance(goal),
                    sequence,
                });
            }
        }
    }

    log::debug!("No path {} -> {}", start, goal);
    Path::none()
}

/// Walkable neighbors of `pos`, plus the goal itself when the options allow
/// stepping onto an occupied goal.
fn expand(grid: &Grid, pos: Position, goal: Position, options: &PathOptions) -> Vec<Position> {
    if !options.allow_occupied_goal || !pos.is_adjacent(goal) {
        return grid.neighbors4(pos);
    }

    pos.cardinal_adjacent_positions()
        .into_iter()
        .filter(|&next| {
            grid.can_walk(next)
                || (next == goal
                    && grid
                        .terrain(next)
                        .map(TerrainKind::is_passable)
                        .unwrap_or(false))
        })
        .collect()
}

fn reconstruct_path(came_from: &HashMap<Position, Position>, start: Position, goal: Position) -> Path {
    let mut positions = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(&previous) => {
                positions.push(previous);
                current = previous;
            }
            None => return Path::none(),
        }
    }
    positions.reverse();
    Path::from(positions)
}

/// Frontier entry for the A* heap.
#[derive(Debug, Clone, Copy)]
struct AStarNode {
    position: Position,
    priority: u32,
    /// Insertion order; earlier entries win ties.
    sequence: u64,
}

impl PartialEq for AStarNode {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for AStarNode {}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior in BinaryHeap
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}
