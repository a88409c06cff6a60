//! # Map Files
//!
//! The plain-text level format: one character per cell, one row per line.
//!
//! Spawn markers (`@`, `R`, `S`) are not terrain. On load each marker is
//! recorded as a [`Spawn`] and its cell is filled with the nearest floor kind
//! found by breadth-first search; on save the marker is written back over
//! the cell.

use crate::utils::resolve_pending;
use crate::{Glyph, Grid, Position, SpawnMarker, TerrainKind, WayfarerError, WayfarerResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

/// A spawn marker and where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub marker: SpawnMarker,
    pub position: Position,
}

/// A grid together with the actor spawns that belong on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub grid: Grid,
    pub spawns: Vec<Spawn>,
}

impl Level {
    /// Position of the first player spawn, if any.
    pub fn player_spawn(&self) -> Option<Position> {
        self.spawns
            .iter()
            .find(|spawn| spawn.marker == SpawnMarker::Player)
            .map(|spawn| spawn.position)
    }

    /// Encodes the level in the map format.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::{parse, serialize};
    ///
    /// let text = "#####\n#.@.#\n#####\n";
    /// let level = parse(text).unwrap();
    /// assert_eq!(serialize(&level), text);
    /// ```
    pub fn serialize(&self) -> String {
        let mut symbols: Vec<Vec<char>> = self
            .grid
            .rows()
            .map(|row| row.iter().map(|cell| cell.terrain.symbol()).collect())
            .collect();

        for spawn in &self.spawns {
            if let Some(symbol) = symbols
                .get_mut(spawn.position.y as usize)
                .and_then(|row| row.get_mut(spawn.position.x as usize))
            {
                *symbol = spawn.marker.symbol();
            }
        }

        let mut out = String::with_capacity(symbols.len() * (self.grid.width() as usize + 1));
        for row in symbols {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

/// Decodes map text into a level.
///
/// Short rows are padded with Blank up to the longest row. Any character
/// outside the symbol table fails the whole parse.
pub fn parse(text: &str) -> WayfarerResult<Level> {
    let lines: Vec<&str> = text.lines().collect();
    let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    if lines.is_empty() || width == 0 {
        return Err(WayfarerError::EmptyMap);
    }

    let mut grid = Grid::new(width as u32, lines.len() as u32);
    let mut spawns = Vec::new();

    for (y, line) in lines.iter().enumerate() {
        for (x, c) in line.chars().enumerate() {
            let pos = Position::new(x as i32, y as i32);
            match Glyph::from_char(c) {
                Some(Glyph::Terrain(terrain)) => grid.set_terrain(pos, terrain)?,
                Some(Glyph::Spawn(marker)) => spawns.push(Spawn {
                    marker,
                    position: pos,
                }),
                None => {
                    return Err(WayfarerError::MalformedInput {
                        line: y + 1,
                        column: x + 1,
                        found: c,
                    })
                }
            }
        }
    }

    // Markers resolve in file order, so a marker next to an already
    // resolved one can inherit its floor. Unresolved markers stay passable.
    let mut pending: HashSet<Position> = spawns.iter().map(|spawn| spawn.position).collect();
    for spawn in &spawns {
        let floor = resolve_pending(&grid, spawn.position, &pending);
        grid.set_terrain(spawn.position, floor)?;
        pending.remove(&spawn.position);
    }

    log::debug!(
        "Parsed {}x{} map with {} spawn markers",
        grid.width(),
        grid.height(),
        spawns.len()
    );

    Ok(Level { grid, spawns })
}

/// Encodes a level in the map format. See [`Level::serialize`].
pub fn serialize(level: &Level) -> String {
    level.serialize()
}

/// Reads and decodes a map file.
pub fn load<P: AsRef<Path>>(path: P) -> WayfarerResult<Level> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let level = parse(&text)?;
    log::info!(
        "Loaded level {} ({}x{})",
        path.display(),
        level.grid.width(),
        level.grid.height()
    );
    Ok(level)
}

/// Writes a level, replacing any previous file at `path` in one rename.
pub fn save<P: AsRef<Path>>(level: &Level, path: P) -> WayfarerResult<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(level.serialize().as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path)?;

    log::info!("Saved level to {}", path.display());
    Ok(())
}
