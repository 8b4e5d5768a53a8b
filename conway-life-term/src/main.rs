#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod world;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use life_grid::{PATTERN_NAMES, Pattern, Random};
use log::info;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;
use term_main_support::{CellGlyphs, Rgb, Settings, animate};
use world::{ConwayWorld, Seeding};

/// Conway's Game of Life in the terminal.
///
/// Keys: space pause, + / - speed, n step, r reset, c clear, a counts,
/// g ages, s status, arrows pan, q or Esc quit. Left click toggles a cell;
/// right drag pans.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Starting pattern: "random", "empty" or a built-in name
    /// (see --list-patterns)
    #[arg(short, long, default_value = "random")]
    pattern: String,

    /// Read the starting pattern from a plaintext or RLE file instead
    #[arg(long, value_name = "PATH")]
    pattern_file: Option<PathBuf>,

    /// Random seeding makes each cell live with probability 1/DENSITY
    #[arg(long, default_value_t = 4)]
    density: u32,

    /// Seed for reproducible random boards
    #[arg(long)]
    seed: Option<u64>,

    /// Generations per second
    #[arg(long, default_value_t = term_main_support::DEFAULT_SPEED,
          value_parser = clap::value_parser!(u8).range(1..=10))]
    speed: u8,

    /// Start paused
    #[arg(long)]
    paused: bool,

    /// Wrap the edges so the board is a torus
    #[arg(short, long)]
    wrap: bool,

    /// Print live neighbor counts inside cells
    #[arg(long)]
    show_neighbor_counts: bool,

    /// Print cell ages inside cells
    #[arg(long)]
    show_age: bool,

    /// Hide the status line
    #[arg(long)]
    no_status: bool,

    /// Live cell foreground color as RRGGBB
    #[arg(long, default_value = "0000ff", value_name = "HEX")]
    foreground: Rgb,

    /// Live cell background color as RRGGBB
    #[arg(long, default_value = "ffffff", value_name = "HEX")]
    background: Rgb,

    /// Two characters drawn for each live cell
    #[arg(long, default_value = "  ")]
    glyphs: String,

    /// Milliseconds per frame
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..=1000))]
    frame_ms: u64,

    /// Write log output to this file; RUST_LOG sets the filter
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the built-in pattern names and exit
    #[arg(long)]
    list_patterns: bool,
}

impl Args {
    fn settings(&self) -> Settings {
        Settings {
            paused: self.paused,
            speed: self.speed,
            show_neighbor_counts: self.show_neighbor_counts,
            show_age: self.show_age,
            show_status: !self.no_status,
            wrap: self.wrap,
            foreground: self.foreground,
            background: self.background,
            cell_glyphs: CellGlyphs::parse_or_blank(&self.glyphs),
            frame_interval: Duration::from_millis(self.frame_ms),
        }
    }

    fn seeding(&self) -> Result<Seeding> {
        if let Some(path) = &self.pattern_file {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read pattern file {}", path.display()))?;
            let pattern = Pattern::parse(&text)
                .with_context(|| format!("bad pattern in {}", path.display()))?;
            return Ok(Seeding::Pattern(pattern));
        }
        let seeding = match self.pattern.as_str() {
            "random" => Seeding::Random {
                density: self.density,
            },
            "empty" => Seeding::Empty,
            name => Seeding::Pattern(Pattern::named(name)?),
        };
        Ok(seeding)
    }

    fn random(&self) -> Random {
        self.seed.map(Random::from_seed).unwrap_or_default()
    }
}

/// Logs go to a file because stderr shares the full-screen display.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.list_patterns {
        for name in PATTERN_NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    init_logging(args.log_file.as_deref())?;
    let settings = args.settings();
    let seeding = args.seeding()?;
    let rand = args.random();
    let topology = settings.topology();
    info!("starting with {settings:?}");

    animate(settings, move |size| {
        Ok(ConwayWorld::new(size, topology, seeding, rand)?)
    })
}
