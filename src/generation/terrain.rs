//! # Terrain Synthesis
//!
//! Turns a noise field into a walled level with scattered features.
//!
//! The border ring is always wall. Interior cells are classified by the noise
//! value at `(x / scale, y / scale)`. Grass and dirt cells form the open pool
//! that trees, monster spawns and finally the player spawn are drawn from,
//! each draw removing its tile from the pool.

use super::{GenerationConfig, Generator, Perlin};
use crate::game::{Grid, Level, Position, Spawn, SpawnMarker, TerrainKind};
use crate::{WayfarerError, WayfarerResult};
use rand::rngs::StdRng;
use rand::Rng;

/// Noise-driven level synthesizer.
#[derive(Debug, Clone, Default)]
pub struct TerrainSynthesizer;

impl TerrainSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Lays down border walls and classified interior terrain. Returns the
    /// grid and its open tiles in row-major order.
    pub fn lay_terrain(&self, config: &GenerationConfig) -> (Grid, Vec<Position>) {
        let perlin = Perlin::new(config.alpha, config.beta, config.octaves, config.seed);
        let mut grid = Grid::new(config.width, config.height);
        let mut open = Vec::new();

        for pos in grid.positions().collect::<Vec<_>>() {
            let terrain = if grid.is_border(pos) {
                TerrainKind::Wall
            } else {
                let value = perlin.noise2d(pos.x as f64 / config.scale, pos.y as f64 / config.scale);
                config.classify(value)
            };

            if terrain.is_open() {
                open.push(pos);
            }
            if let Some(cell) = grid.cell_mut(pos) {
                cell.terrain = terrain;
            }
        }

        (grid, open)
    }
}

/// Draws a uniformly random tile from the pool and removes it.
fn take_open_tile(open: &mut Vec<Position>, rng: &mut StdRng) -> Option<Position> {
    if open.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..open.len());
    Some(open.swap_remove(index))
}

impl Generator<Level> for TerrainSynthesizer {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> WayfarerResult<Level> {
        config.check()?;
        let (mut grid, mut open) = self.lay_terrain(config);

        let required = config.required_open_tiles();
        if open.len() < required {
            return Err(WayfarerError::GenerationFailed(format!(
                "Only {} open tiles for {} features (seed {})",
                open.len(),
                required,
                config.seed
            )));
        }

        for _ in 0..config.tree_count {
            if let Some(pos) = take_open_tile(&mut open, rng) {
                grid.set_terrain(pos, TerrainKind::Tree)?;
            }
        }

        let markers = std::iter::repeat(SpawnMarker::Rat)
            .take(config.rat_count)
            .chain(std::iter::repeat(SpawnMarker::Spider).take(config.spider_count))
            .chain(std::iter::once(SpawnMarker::Player));

        let mut spawns = Vec::with_capacity(required - config.tree_count);
        for marker in markers {
            if let Some(position) = take_open_tile(&mut open, rng) {
                spawns.push(Spawn { marker, position });
            }
        }

        let level = Level { grid, spawns };
        self.validate(&level, config)?;

        log::info!(
            "Generated {}x{} level from seed {} ({} trees, {} spawns, {} open tiles left)",
            config.width,
            config.height,
            config.seed,
            config.tree_count,
            level.spawns.len(),
            open.len()
        );

        Ok(level)
    }

    fn validate(&self, content: &Level, config: &GenerationConfig) -> WayfarerResult<()> {
        let grid = &content.grid;
        if grid.width() != config.width || grid.height() != config.height {
            return Err(WayfarerError::GenerationFailed(format!(
                "Grid is {}x{}, expected {}x{}",
                grid.width(),
                grid.height(),
                config.width,
                config.height
            )));
        }

        if let Some(pos) = grid
            .positions()
            .find(|&pos| grid.is_border(pos) && grid.terrain(pos) != Some(TerrainKind::Wall))
        {
            return Err(WayfarerError::GenerationFailed(format!(
                "Border cell {} is not a wall",
                pos
            )));
        }

        let players = content
            .spawns
            .iter()
            .filter(|spawn| spawn.marker == SpawnMarker::Player)
            .count();
        if players != 1 {
            return Err(WayfarerError::GenerationFailed(format!(
                "Expected one player spawn, found {}",
                players
            )));
        }

        for spawn in &content.spawns {
            let floor = grid.terrain(spawn.position);
            if !floor.map(TerrainKind::is_open).unwrap_or(false) {
                return Err(WayfarerError::GenerationFailed(format!(
                    "{:?} spawn at {} is not on open ground",
                    spawn.marker, spawn.position
                )));
            }
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "TerrainSynthesizer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{create_rng, generate, generate_with};
    use std::collections::HashSet;

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate(80, 40, 12345).unwrap();
        let b = generate(80, 40, 12345).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.serialize(), b.serialize());
    }

    #[test]
    fn test_different_seeds_give_different_levels() {
        let a = generate(80, 40, 1).unwrap();
        let b = generate(80, 40, 2).unwrap();
        assert_ne!(a.serialize(), b.serialize());
    }

    #[test]
    fn test_border_is_wall() {
        let level = generate(40, 25, 777).unwrap();
        let grid = &level.grid;
        for x in 0..40 {
            assert_eq!(grid.terrain(Position::new(x, 0)), Some(TerrainKind::Wall));
            assert_eq!(grid.terrain(Position::new(x, 24)), Some(TerrainKind::Wall));
        }
        for y in 0..25 {
            assert_eq!(grid.terrain(Position::new(0, y)), Some(TerrainKind::Wall));
            assert_eq!(grid.terrain(Position::new(39, y)), Some(TerrainKind::Wall));
        }
    }

    #[test]
    fn test_feature_counts() {
        let level = generate(80, 40, 12345).unwrap();
        assert_eq!(level.grid.count(TerrainKind::Tree), 200);

        let count = |marker| level.spawns.iter().filter(|s| s.marker == marker).count();
        assert_eq!(count(SpawnMarker::Rat), 5);
        assert_eq!(count(SpawnMarker::Spider), 5);
        assert_eq!(count(SpawnMarker::Player), 1);

        let distinct: HashSet<Position> = level.spawns.iter().map(|s| s.position).collect();
        assert_eq!(distinct.len(), level.spawns.len());
    }

    #[test]
    fn test_interior_is_classified() {
        let config = GenerationConfig::for_testing(3);
        let (grid, open) = TerrainSynthesizer::new().lay_terrain(&config);
        for pos in grid.positions() {
            let terrain = grid.terrain(pos).unwrap();
            if grid.is_border(pos) {
                assert_eq!(terrain, TerrainKind::Wall);
            } else {
                assert!(matches!(
                    terrain,
                    TerrainKind::Water | TerrainKind::Sand | TerrainKind::Grass | TerrainKind::DirtFloor
                ));
            }
        }
        assert!(open.iter().all(|&pos| grid.terrain(pos).unwrap().is_open()));
    }

    #[test]
    fn test_too_small_map_fails() {
        let result = generate(4, 4, 12345);
        assert!(matches!(result, Err(WayfarerError::GenerationFailed(_))));
    }

    #[test]
    fn test_featureless_tiny_map_succeeds_when_open() {
        let mut config = GenerationConfig::for_testing(11).with_size(3, 3);
        config.tree_count = 0;
        config.rat_count = 0;
        config.spider_count = 0;
        // A 3x3 map has a single interior cell; it only succeeds if that
        // cell is grass or dirt.
        let (grid, open) = TerrainSynthesizer::new().lay_terrain(&config);
        let result = generate_with(&config);
        if open.is_empty() {
            assert!(result.is_err());
        } else {
            let level = result.unwrap();
            assert_eq!(level.player_spawn(), Some(Position::new(1, 1)));
            assert_eq!(level.grid.terrain(Position::new(1, 1)), grid.terrain(Position::new(1, 1)));
        }
    }

    #[test]
    fn test_generator_metadata_and_validate() {
        let synthesizer = TerrainSynthesizer::new();
        assert_eq!(synthesizer.generator_type(), "TerrainSynthesizer");

        let config = GenerationConfig::for_testing(21);
        let mut rng = create_rng(&config);
        let mut level = synthesizer.generate(&config, &mut rng).unwrap();
        assert!(synthesizer.validate(&level, &config).is_ok());

        level.spawns.retain(|spawn| spawn.marker != SpawnMarker::Player);
        assert!(synthesizer.validate(&level, &config).is_err());
    }

    #[test]
    fn test_generate_to_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps").join("level1.map");
        let level = crate::generation::generate_to_file(60, 30, 4242, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, level.serialize());
        assert_eq!(text.lines().count(), 30);
        assert!(text.lines().all(|line| line.chars().count() == 60));
        assert_eq!(text.matches('@').count(), 1);
    }
}
