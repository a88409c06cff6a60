//! # Wayfarer Command Line
//!
//! Generates level files and answers path and visibility queries against them.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wayfarer::{
    config, find_path, generate_with, load, save, GenerationConfig, Position, Session,
    SessionConfig, WayfarerResult,
};

/// Command line arguments for Wayfarer.
#[derive(Parser, Debug)]
#[command(name = "wayfarer")]
#[command(about = "Tile-grid terrain generation, pathfinding and fog of war")]
#[command(version)]
struct Args {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize a level from Perlin noise and write it to disk
    Generate {
        /// Grid width in tiles
        #[arg(long)]
        width: Option<u32>,

        /// Grid height in tiles
        #[arg(long)]
        height: Option<u32>,

        /// Random seed for terrain and feature placement
        #[arg(short, long)]
        seed: Option<u64>,

        /// Where to write the level file
        #[arg(short, long, default_value = config::DEFAULT_MAP_PATH)]
        output: PathBuf,

        /// JSON generation config; flags above override its fields
        #[arg(long = "config")]
        config_file: Option<PathBuf>,
    },

    /// Print the shortest path between two cells of a level
    Path {
        #[arg(short, long, default_value = config::DEFAULT_MAP_PATH)]
        map: PathBuf,

        /// Start cell as x,y
        #[arg(long, value_parser = parse_position)]
        from: Position,

        /// Goal cell as x,y
        #[arg(long, value_parser = parse_position)]
        to: Position,
    },

    /// Print a level as the player would see it from the spawn point
    View {
        #[arg(short, long, default_value = config::DEFAULT_MAP_PATH)]
        map: PathBuf,

        /// Sight radius in tiles
        #[arg(short, long, default_value_t = config::DEFAULT_SIGHT_RADIUS)]
        radius: u32,
    },
}

fn main() -> WayfarerResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    log::debug!("Starting Wayfarer v{}", wayfarer::VERSION);

    match args.command {
        Command::Generate {
            width,
            height,
            seed,
            output,
            config_file,
        } => {
            let mut generation = match config_file {
                Some(path) => GenerationConfig::from_json_file(path)?,
                None => GenerationConfig::default(),
            };
            if let Some(width) = width {
                generation.width = width;
            }
            if let Some(height) = height {
                generation.height = height;
            }
            if let Some(seed) = seed {
                generation.seed = seed;
            }

            let level = generate_with(&generation)?;
            save(&level, &output)?;
            println!(
                "Wrote {}x{} level (seed {}) to {}",
                generation.width,
                generation.height,
                generation.seed,
                output.display()
            );
        }

        Command::Path { map, from, to } => {
            let level = load(&map)?;
            let path = find_path(&level.grid, from, to);
            if path.is_empty() {
                println!("no path");
            } else {
                let cells: Vec<String> = path.positions().iter().map(ToString::to_string).collect();
                println!("{} steps: {}", path.steps(), cells.join(" -> "));
            }
        }

        Command::View { map, radius } => {
            let level = load(&map)?;
            let session_config = SessionConfig {
                sight_radius: radius,
                ..SessionConfig::default()
            };
            let session = Session::from_level(level, &session_config)?;
            print!("{}", session.grid().render_fog());
            if let Some(player) = session.player() {
                println!(
                    "Player at {} ({} hp), {} monsters on the level",
                    player.position,
                    player.stats.hitpoints,
                    session.occupants().len() - 1
                );
            }
        }
    }

    Ok(())
}

/// Parses `x,y` into a position.
fn parse_position(text: &str) -> Result<Position, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {:?}", text))?;
    let x = x.trim().parse::<i32>().map_err(|err| err.to_string())?;
    let y = y.trim().parse::<i32>().map_err(|err| err.to_string())?;
    Ok(Position::new(x, y))
}

/// Initializes the logging system based on the specified level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
            .with_target(false)
            .init();
        tracing::debug!("Tracing subscriber installed");
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp(None)
            .init();
    }
}
