//! Command-line front end: generate a layout and print it.

use std::path::PathBuf;

use anyhow::Context as _;
use bsp_dungeon::constants::*;
use bsp_dungeon::{DungeonGenerator, GeneratorConfig, Position, Rectangle, TileGrid};
use log::info;

#[derive(Debug, clap::Parser)]
#[command(version, about = "Generate a BSP dungeon layout")]
struct Args {
    /// Width of the level in cells
    #[arg(long, default_value_t = DUNGEON_DEFAULT_WIDTH)]
    width: i32,

    /// Height of the level in cells
    #[arg(long, default_value_t = DUNGEON_DEFAULT_HEIGHT)]
    height: i32,

    /// JSON file with generator options; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the random source (random if absent)
    #[arg(long)]
    seed: Option<u64>,

    /// Minimum width/height of a chunk on either side of a split
    #[arg(long)]
    min_split_size: Option<i32>,

    /// Largest fraction of a chunk the bigger side of a split may take
    #[arg(long)]
    max_split_ratio: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,

    /// Log each generation stage to stderr; repeat for per-split detail
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Ascii,
    Json,
}

fn main() -> Result<(), anyhow::Error> {
    let args = <Args as clap::Parser>::parse();

    use simplelog::LevelFilter::{Debug, Info, Off, Trace};
    simplelog::TermLogger::init(
        match args.verbose {
            0 => Info,
            1 => Debug,
            _ => Trace,
        },
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(size) = args.min_split_size {
        config.min_split_size = size;
    }
    if let Some(ratio) = args.max_split_ratio {
        config.max_split_ratio = ratio;
    }

    let bounds = Rectangle::try_with_size(Position::new(0, 0), args.width, args.height)
        .context("invalid level size")?;
    if let OutputFormat::Ascii = args.format {
        TileGrid::cell_count(&bounds).context("level too large to print")?;
    }

    let mut generator = DungeonGenerator::new(config)?;
    info!("generating {}x{} level with seed {}", args.width, args.height, generator.seed());
    let layout = generator.generate(bounds)?;

    match args.format {
        OutputFormat::Ascii => print!("{}", layout.to_tile_grid()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&layout)?),
    }
    Ok(())
}
