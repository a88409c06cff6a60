//! # Grid Model
//!
//! The shared spatial data structure every engine reads and mutates: a
//! row-major matrix of [`Cell`]s plus an index of which occupant stands where.
//!
//! Out-of-bounds queries answer "blocked" instead of failing, so neighbor
//! probing at the edge of the map never needs its own guard.

use crate::{Cell, OccupantId, Position, TerrainKind, WayfarerError, WayfarerResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rectangular tile matrix with occupancy and visibility state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    /// Position -> occupant handle. At most one occupant per position.
    #[serde(with = "occupancy_entries")]
    occupancy: HashMap<Position, OccupantId>,
}

/// JSON object keys must be strings, so the index travels as a sorted list
/// of `(position, occupant)` pairs.
mod occupancy_entries {
    use crate::{OccupantId, Position};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    pub fn serialize<S: Serializer>(
        index: &HashMap<Position, OccupantId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(Position, OccupantId)> =
            index.iter().map(|(&pos, &id)| (pos, id)).collect();
        entries.sort();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<Position, OccupantId>, D::Error> {
        let entries = Vec::<(Position, OccupantId)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

/// Unchecked wire form of [`Grid`].
#[derive(Deserialize)]
struct RawGrid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    #[serde(with = "occupancy_entries")]
    occupancy: HashMap<Position, OccupantId>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = WayfarerError;

    fn try_from(raw: RawGrid) -> WayfarerResult<Self> {
        let expected = raw.width as usize * raw.height as usize;
        if raw.cells.len() != expected {
            return Err(WayfarerError::InvalidState(format!(
                "Grid is {}x{} but holds {} cells",
                raw.width,
                raw.height,
                raw.cells.len()
            )));
        }

        let grid = Grid {
            width: raw.width,
            height: raw.height,
            cells: raw.cells,
            occupancy: HashMap::new(),
        };
        if let Some(pos) = raw.occupancy.keys().find(|&&pos| !grid.in_bounds(pos)) {
            return Err(WayfarerError::InvalidState(format!(
                "Occupant index entry {} lies outside the grid",
                pos
            )));
        }

        Ok(Grid {
            occupancy: raw.occupancy,
            ..grid
        })
    }
}

impl Grid {
    /// Creates a grid of Blank cells.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::{Grid, Position, TerrainKind};
    ///
    /// let grid = Grid::new(4, 3);
    /// assert_eq!(grid.width(), 4);
    /// assert_eq!(grid.terrain(Position::new(3, 2)), Some(TerrainKind::Blank));
    /// assert_eq!(grid.terrain(Position::new(4, 0)), None);
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TerrainKind::Blank)
    }

    /// Creates a grid with every cell set to `terrain`.
    pub fn filled(width: u32, height: u32, terrain: TerrainKind) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::new(terrain); width as usize * height as usize],
            occupancy: HashMap::new(),
        }
    }

    /// Creates a walled rectangle with `floor` inside.
    pub fn walled(width: u32, height: u32, floor: TerrainKind) -> Self {
        let mut grid = Self::filled(width, height, floor);
        for pos in grid.positions().collect::<Vec<_>>() {
            if grid.is_border(pos) {
                if let Some(cell) = grid.cell_mut(pos) {
                    cell.terrain = TerrainKind::Wall;
                }
            }
        }
        grid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `pos` lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Whether `pos` is on the outermost ring of the grid.
    pub fn is_border(&self, pos: Position) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x as u32 == self.width - 1
                || pos.y as u32 == self.height - 1)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.index(pos).map(move |i| &mut self.cells[i])
    }

    /// Terrain at `pos`, or None when out of bounds.
    pub fn terrain(&self, pos: Position) -> Option<TerrainKind> {
        self.cell(pos).map(|cell| cell.terrain)
    }

    /// Replaces the terrain at `pos`, keeping its visibility state.
    pub fn set_terrain(&mut self, pos: Position, terrain: TerrainKind) -> WayfarerResult<()> {
        let cell = self.cell_mut(pos).ok_or_else(|| {
            WayfarerError::InvalidAction(format!("Position {} is out of bounds", pos))
        })?;
        cell.terrain = terrain;
        Ok(())
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Number of cells holding `terrain`.
    pub fn count(&self, terrain: TerrainKind) -> usize {
        self.cells.iter().filter(|cell| cell.terrain == terrain).count()
    }

    /// Whether an occupant could step onto `pos` right now.
    pub fn can_walk(&self, pos: Position) -> bool {
        match self.terrain(pos) {
            Some(terrain) => terrain.is_passable() && !self.is_occupied(pos),
            None => false,
        }
    }

    /// Whether sight passes through `pos`. Occupants never block sight.
    pub fn can_see_through(&self, pos: Position) -> bool {
        self.terrain(pos)
            .map(TerrainKind::is_transparent)
            .unwrap_or(false)
    }

    /// Walkable orthogonal neighbors in right, left, up, down order.
    pub fn neighbors4(&self, pos: Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(4);
        for next in pos.cardinal_adjacent_positions() {
            if self.can_walk(next) {
                neighbors.push(next);
            }
        }
        neighbors
    }

    /// Opens a closed door at `pos`. Returns whether a door opened.
    ///
    /// The caller owns the observer and must refresh visibility when this
    /// returns true.
    pub fn toggle_door(&mut self, pos: Position) -> bool {
        match self.cell_mut(pos) {
            Some(cell) if cell.terrain == TerrainKind::ClosedDoor => {
                cell.terrain = TerrainKind::OpenDoor;
                log::debug!("Door opened at {}", pos);
                true
            }
            _ => false,
        }
    }

    pub fn occupant_at(&self, pos: Position) -> Option<OccupantId> {
        self.occupancy.get(&pos).copied()
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.occupancy.contains_key(&pos)
    }

    /// Number of indexed occupants.
    pub fn occupant_count(&self) -> usize {
        self.occupancy.len()
    }

    /// Records `id` as standing on `pos`.
    pub fn place_occupant(&mut self, id: OccupantId, pos: Position) -> WayfarerResult<()> {
        if !self.in_bounds(pos) {
            return Err(WayfarerError::InvalidAction(format!(
                "Cannot place {} out of bounds at {}",
                id, pos
            )));
        }
        if let Some(other) = self.occupant_at(pos) {
            return Err(WayfarerError::InvalidAction(format!(
                "Cannot place {} at {}: occupied by {}",
                id, pos, other
            )));
        }
        self.occupancy.insert(pos, id);
        Ok(())
    }

    /// Moves the occupant standing on `from` to `to`.
    pub fn move_occupant(&mut self, from: Position, to: Position) -> WayfarerResult<OccupantId> {
        if self.is_occupied(to) {
            return Err(WayfarerError::InvalidAction(format!(
                "Position {} is occupied",
                to
            )));
        }
        let id = self.occupancy.remove(&from).ok_or_else(|| {
            WayfarerError::InvalidState(format!("No occupant at {}", from))
        })?;
        if let Err(err) = self.place_occupant(id, to) {
            self.occupancy.insert(from, id);
            return Err(err);
        }
        Ok(id)
    }

    /// Drops whoever stands on `pos` from the index.
    pub fn remove_occupant(&mut self, pos: Position) -> Option<OccupantId> {
        self.occupancy.remove(&pos)
    }

    /// Clears every `visible` flag. `seen` is left alone.
    pub fn clear_visible(&mut self) {
        for cell in &mut self.cells {
            cell.visible = false;
        }
    }

    pub fn is_visible(&self, pos: Position) -> bool {
        self.cell(pos).map(|cell| cell.visible).unwrap_or(false)
    }

    pub fn is_seen(&self, pos: Position) -> bool {
        self.cell(pos).map(|cell| cell.seen).unwrap_or(false)
    }

    /// Renders the map with fog applied: cells never seen come out blank.
    pub fn render_fog(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for row in self.rows() {
            for cell in row {
                out.push(if cell.seen { cell.terrain.symbol() } else { ' ' });
            }
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;
        for row in self.rows() {
            for cell in row {
                f.write_char(cell.terrain.symbol())?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

/// See [`Grid::can_walk`].
pub fn can_walk(grid: &Grid, pos: Position) -> bool {
    grid.can_walk(pos)
}

/// Opens a closed door at `pos`. See [`Grid::toggle_door`].
///
/// Visibility is not touched: whoever owns the observer refreshes it when
/// this returns true, as [`Session`](crate::Session) does on a door bump.
pub fn toggle_door(grid: &mut Grid, pos: Position) -> bool {
    grid.toggle_door(pos)
}
