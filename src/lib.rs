//! # Wayfarer
//!
//! Spatial reasoning for tile-grid worlds.
//!
//! ## Architecture Overview
//!
//! The crate is organised around a single shared data structure, the [`Grid`],
//! and a handful of stateless engines that read and mutate it:
//!
//! - **Grid Model**: terrain, occupancy index, and the visible/seen overlay
//! - **Traversal Engine**: nearest-floor breadth-first search and A* paths
//! - **Visibility Engine**: line tracing with sticky fog of war
//! - **Generation System**: deterministic Perlin noise and terrain synthesis
//! - **Session**: turn-level glue for player actions and monster chase
//!
//! Nothing in here draws, polls input, or ends the process. Callers own the
//! turn loop and decide what to do with the events and outcomes returned.

pub mod game;
pub mod generation;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use utils::*;

pub use game::{
    Action, Cell, Direction, GameEvent, Level, Grid, Occupant, OccupantId,
    OccupantKind, Occupants, Outcome, Position, Session, SessionConfig, SpawnMarker, Stats,
    TerrainKind, TurnReport,
};

pub use generation::{GenerationConfig, Generator, Perlin, TerrainSynthesizer};

pub use utils::{find_path, find_path_with, recompute_visibility, resolve_pending, Path, PathOptions};

/// Core error type for the Wayfarer engine.
#[derive(thiserror::Error, Debug)]
pub enum WayfarerError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be decoded
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Grid text contained a character outside the symbol table
    #[error("Malformed map input: unexpected {found:?} at line {line}, column {column}")]
    MalformedInput {
        line: usize,
        column: usize,
        found: char,
    },

    /// Grid text contained no rows
    #[error("Malformed map input: map is empty")]
    EmptyMap,

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

impl From<tempfile::PersistError> for WayfarerError {
    fn from(err: tempfile::PersistError) -> Self {
        WayfarerError::Io(err.error)
    }
}

/// Result type used throughout the Wayfarer codebase.
pub type WayfarerResult<T> = Result<T, WayfarerError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Default world width in tiles
    pub const DEFAULT_WORLD_WIDTH: u32 = 80;

    /// Default world height in tiles
    pub const DEFAULT_WORLD_HEIGHT: u32 = 40;

    /// Default location of the generated level file
    pub const DEFAULT_MAP_PATH: &str = "maps/level1.map";

    /// Default seed used when the caller supplies none
    pub const DEFAULT_SEED: u64 = 12345;

    /// Default sight radius of the player, in tiles
    pub const DEFAULT_SIGHT_RADIUS: u32 = 7;

    /// Frontier pops a monster's chase search may spend before giving up
    pub const DEFAULT_CHASE_EXPANSIONS: usize = 4096;

    /// Trees scattered over open tiles during synthesis
    pub const TREE_COUNT: usize = 200;

    /// Rats placed during synthesis
    pub const RAT_COUNT: usize = 5;

    /// Spiders placed during synthesis
    pub const SPIDER_COUNT: usize = 5;
}
