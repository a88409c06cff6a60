//! # Tiles
//!
//! Terrain kinds, spawn markers, and the per-cell visibility state.
//!
//! Every character of the map format is defined exactly once, in
//! [`Glyph::from_char`] and its inverse, so loading and saving can never
//! disagree about a symbol.

use serde::{Deserialize, Serialize};

/// Closed set of terrain kinds a cell can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Wall,
    DirtFloor,
    Grass,
    Sand,
    Water,
    Tree,
    ClosedDoor,
    OpenDoor,
    /// Void outside the mapped area.
    Blank,
}

impl TerrainKind {
    /// Whether the terrain itself lets an occupant stand on it.
    ///
    /// Occupancy is checked separately by [`crate::Grid::can_walk`].
    pub fn is_passable(self) -> bool {
        !self.is_obstruction()
    }

    /// Whether light passes through this terrain.
    pub fn is_transparent(self) -> bool {
        !self.is_obstruction()
    }

    /// Floor kinds a spawn marker may resolve to.
    pub fn is_floor(self) -> bool {
        matches!(
            self,
            TerrainKind::DirtFloor | TerrainKind::Grass | TerrainKind::Sand
        )
    }

    /// Open tiles are eligible for feature placement during synthesis.
    pub fn is_open(self) -> bool {
        matches!(self, TerrainKind::DirtFloor | TerrainKind::Grass)
    }

    fn is_obstruction(self) -> bool {
        matches!(
            self,
            TerrainKind::Wall | TerrainKind::ClosedDoor | TerrainKind::Tree | TerrainKind::Blank
        )
    }

    /// Map symbol for this terrain.
    pub fn symbol(self) -> char {
        match self {
            TerrainKind::Wall => '#',
            TerrainKind::DirtFloor => '.',
            TerrainKind::Grass => ',',
            TerrainKind::Sand => '$',
            TerrainKind::Water => '~',
            TerrainKind::Tree => '^',
            TerrainKind::ClosedDoor => '|',
            TerrainKind::OpenDoor => '/',
            TerrainKind::Blank => ' ',
        }
    }
}

/// Spawn markers found in map files. They are consumed on load and never
/// become terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnMarker {
    Player,
    Rat,
    Spider,
}

impl SpawnMarker {
    /// Map symbol for this marker.
    pub fn symbol(self) -> char {
        match self {
            SpawnMarker::Player => '@',
            SpawnMarker::Rat => 'R',
            SpawnMarker::Spider => 'S',
        }
    }
}

/// One decoded map character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Terrain(TerrainKind),
    Spawn(SpawnMarker),
}

impl Glyph {
    /// Decodes a map character. Returns None for characters outside the table.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::{Glyph, SpawnMarker, TerrainKind};
    ///
    /// assert_eq!(Glyph::from_char('#'), Some(Glyph::Terrain(TerrainKind::Wall)));
    /// assert_eq!(Glyph::from_char('R'), Some(Glyph::Spawn(SpawnMarker::Rat)));
    /// assert_eq!(Glyph::from_char('?'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Glyph> {
        let glyph = match c {
            '#' => Glyph::Terrain(TerrainKind::Wall),
            '.' => Glyph::Terrain(TerrainKind::DirtFloor),
            ',' => Glyph::Terrain(TerrainKind::Grass),
            '$' => Glyph::Terrain(TerrainKind::Sand),
            '~' => Glyph::Terrain(TerrainKind::Water),
            '^' => Glyph::Terrain(TerrainKind::Tree),
            '|' => Glyph::Terrain(TerrainKind::ClosedDoor),
            '/' => Glyph::Terrain(TerrainKind::OpenDoor),
            ' ' | '\t' | '\r' | '\n' => Glyph::Terrain(TerrainKind::Blank),
            '@' => Glyph::Spawn(SpawnMarker::Player),
            'R' => Glyph::Spawn(SpawnMarker::Rat),
            'S' => Glyph::Spawn(SpawnMarker::Spider),
            _ => return None,
        };
        Some(glyph)
    }
}

/// A single grid location: terrain plus the observer overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub terrain: TerrainKind,
    /// In the observer's line of sight this frame.
    pub visible: bool,
    /// Seen at least once. Never reset by a visibility recompute.
    pub seen: bool,
}

impl Cell {
    /// Creates an unseen cell of the given terrain.
    pub fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            visible: false,
            seen: false,
        }
    }

    /// Marks the cell visible, which also marks it seen.
    pub fn reveal(&mut self) {
        self.visible = true;
        self.seen = true;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(TerrainKind::Blank)
    }
}
