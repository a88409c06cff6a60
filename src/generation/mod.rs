//! # Generation Module
//!
//! Procedural terrain synthesis driven by deterministic Perlin noise.
//!
//! Generation runs once, before a session, and produces a [`Level`]: a grid
//! whose interior is classified from a noise field, scattered with trees, and
//! seeded with actor spawn markers. The same configuration always yields the
//! same level.

pub mod noise;
pub mod terrain;

pub use noise::*;
pub use terrain::*;

use crate::game::{Level, TerrainKind};
use crate::{config, WayfarerError, WayfarerResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for terrain synthesis.
///
/// Controls the noise field, the thresholds that turn noise into terrain,
/// and how many features are scattered over open ground.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Grid width in tiles, border included
    pub width: u32,
    /// Grid height in tiles, border included
    pub height: u32,
    /// Weight divisor applied per octave
    pub alpha: f64,
    /// Frequency multiplier applied per octave
    pub beta: f64,
    /// Number of noise octaves summed
    pub octaves: u32,
    /// Tile coordinates are divided by this before sampling
    pub scale: f64,
    /// Noise below this is water
    pub water_below: f64,
    /// Noise below this (and not water) is sand
    pub sand_below: f64,
    /// Noise below this (and not sand) is grass; anything higher is dirt
    pub grass_below: f64,
    /// Trees scattered over open tiles
    pub tree_count: usize,
    /// Rat spawns placed on open tiles
    pub rat_count: usize,
    /// Spider spawns placed on open tiles
    pub spider_count: usize,
}

impl GenerationConfig {
    /// Creates the default configuration for the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert_eq!(config.octaves, 3);
    /// assert_eq!(config.tree_count, 200);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_WORLD_WIDTH,
            height: config::DEFAULT_WORLD_HEIGHT,
            alpha: 2.0,
            beta: 2.0,
            octaves: 3,
            scale: 10.0,
            water_below: -0.4,
            sand_below: -0.3,
            grass_below: 0.3,
            tree_count: config::TREE_COUNT,
            rat_count: config::RAT_COUNT,
            spider_count: config::SPIDER_COUNT,
        }
    }

    /// Creates a configuration for testing with a smaller, sparser map.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            width: 30,
            height: 20,
            tree_count: 20,
            rat_count: 2,
            spider_count: 2,
            ..Self::new(seed)
        }
    }

    /// Same configuration with different dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Reads a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> WayfarerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: GenerationConfig = serde_json::from_str(&text)?;
        config.check()?;
        Ok(config)
    }

    /// Rejects configurations that cannot produce a level.
    pub fn check(&self) -> WayfarerResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WayfarerError::GenerationFailed(format!(
                "Map size {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.octaves == 0 {
            return Err(WayfarerError::GenerationFailed(
                "At least one noise octave is required".to_string(),
            ));
        }
        if self.scale == 0.0 || self.alpha == 0.0 {
            return Err(WayfarerError::GenerationFailed(
                "Noise scale and alpha must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of open tiles the feature placement needs.
    pub fn required_open_tiles(&self) -> usize {
        self.tree_count + self.rat_count + self.spider_count + 1
    }

    /// Classifies a noise value into interior terrain.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfarer::{GenerationConfig, TerrainKind};
    ///
    /// let config = GenerationConfig::default();
    /// assert_eq!(config.classify(-0.5), TerrainKind::Water);
    /// assert_eq!(config.classify(-0.4), TerrainKind::Sand);
    /// assert_eq!(config.classify(0.0), TerrainKind::Grass);
    /// assert_eq!(config.classify(0.3), TerrainKind::DirtFloor);
    /// ```
    pub fn classify(&self, value: f64) -> TerrainKind {
        if value < self.water_below {
            TerrainKind::Water
        } else if value < self.sand_below {
            TerrainKind::Sand
        } else if value < self.grass_below {
            TerrainKind::Grass
        } else {
            TerrainKind::DirtFloor
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(config::DEFAULT_SEED)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> WayfarerResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> WayfarerResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Stream id mixed into the seed for feature placement, so placement draws
/// never overlap the noise table draws.
const PLACEMENT_STREAM: u64 = 0x504C_4143_454D_454E;

/// Derives an independent sub-seed for `stream`.
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    let mut hash = seed ^ stream;
    hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
    hash ^= hash >> 32;
    hash
}

/// Creates the seeded placement RNG for a configuration.
pub fn create_rng(config: &GenerationConfig) -> StdRng {
    StdRng::seed_from_u64(derive_seed(config.seed, PLACEMENT_STREAM))
}

/// Synthesizes a level of the given size with the default configuration.
///
/// # Examples
///
/// ```
/// use wayfarer::{generate, Position, TerrainKind};
///
/// let level = generate(80, 40, 12345).unwrap();
/// assert_eq!(level.grid.terrain(Position::new(0, 0)), Some(TerrainKind::Wall));
/// assert!(level.player_spawn().is_some());
/// ```
pub fn generate(width: u32, height: u32, seed: u64) -> WayfarerResult<Level> {
    generate_with(&GenerationConfig::new(seed).with_size(width, height))
}

/// Synthesizes a level from an explicit configuration.
pub fn generate_with(config: &GenerationConfig) -> WayfarerResult<Level> {
    let mut rng = create_rng(config);
    TerrainSynthesizer::new().generate(config, &mut rng)
}

/// Synthesizes a level and writes it to `path`, replacing any previous file.
pub fn generate_to_file<P: AsRef<Path>>(
    width: u32,
    height: u32,
    seed: u64,
    path: P,
) -> WayfarerResult<Level> {
    let level = generate(width, height, seed)?;
    crate::game::save(&level, path)?;
    Ok(level)
}
