// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Argument parsing and subcommand dispatch for the `tilemap` binary.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tilemap_config::schema::DEFAULT_EQUAL_DIST;
use tilemap_config::{ConfigService, FsConfigStore, MapConfig, MAP_CONFIG_KEY};
use tilemap_geom::{convex_hull, dissolve_with_report, Line, Point};
use tilemap_pipeline::{decode_geometry, group_features, process_with_config, Feature, TileFrame};

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(name = "tilemap")]
#[command(version, about = "Vector-tile geometry tools")]
pub struct Cli {
    /// Write the JSON result to this file instead of stdout
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands. Every input is a JSON file, or `-` for stdin.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convex hull of a JSON array of `[x, y]` points
    Hull {
        /// Points file
        input: PathBuf,
    },
    /// Merge line fragments (a JSON array of point arrays) into maximal lines and loops
    Dissolve {
        /// Lines file
        input: PathBuf,
        /// Points closer than this are the same point
        #[arg(long, default_value_t = DEFAULT_EQUAL_DIST)]
        equal_dist: f64,
    },
    /// Group features by kind, layer and tags and run the configured processing
    Process {
        /// Features file (JSON array of `{layer, kind, tags, shape}`)
        input: PathBuf,
        /// Map configuration file; defaults to `map_config.json` in the user config dir
        #[arg(long)]
        config: Option<PathBuf>,
        /// Only run configured groups reading this layer
        #[arg(long)]
        layer: Option<String>,
    },
    /// Decode a JSON array of tile geometry command integers into map coordinates
    Decode {
        /// Commands file
        input: PathBuf,
        /// Tile column
        #[arg(long)]
        tile_x: u32,
        /// Tile row
        #[arg(long)]
        tile_y: u32,
        /// Tile edge length in map units
        #[arg(long)]
        tile_size: f64,
        /// Layer extent in tile units
        #[arg(long)]
        extent: u32,
        /// Map x of the tile grid origin
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        origin_x: f64,
        /// Map y of the tile grid origin
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        origin_y: f64,
    },
}

/// Parses arguments, installs logging and runs the chosen subcommand.
pub fn entrypoint() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;
    run(cli)
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

/// Runs one parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let Cli { out, command } = cli;
    let out = out.as_deref();
    match command {
        Commands::Hull { input } => {
            let points: Vec<Point> = read_json(&input)?;
            let hull = convex_hull(&points).context("failed to compute convex hull")?;
            info!(points = points.len(), hull = hull.len(), "computed hull");
            write_json(out, &hull)
        }
        Commands::Dissolve { input, equal_dist } => {
            let lines: Vec<Line> = read_json(&input)?;
            let (lines, report) =
                dissolve_with_report(lines, equal_dist).context("failed to dissolve lines")?;
            info!(
                fragments = report.fragments,
                merges = report.merges,
                loops = report.loops_closed,
                output = lines.len(),
                "dissolved lines"
            );
            write_json(out, &lines)
        }
        Commands::Process {
            input,
            config,
            layer,
        } => {
            let config = load_config(config.as_deref())?;
            let features: Vec<Feature> = read_json(&input)?;
            let groups = group_features(features);
            let processed = process_with_config(&groups, &config, layer.as_deref())
                .context("failed to process feature groups")?;
            if processed.is_empty() {
                warn!(layer = ?layer, "no configured group matched");
            }
            write_json(out, &processed)
        }
        Commands::Decode {
            input,
            tile_x,
            tile_y,
            tile_size,
            extent,
            origin_x,
            origin_y,
        } => {
            let commands: Vec<u32> = read_json(&input)?;
            let frame = TileFrame::for_tile(
                Point::new(origin_x, origin_y),
                tile_size,
                tile_x,
                tile_y,
                extent,
            )?;
            let shapes = decode_geometry(&commands, &frame).context("failed to decode geometry")?;
            info!(commands = commands.len(), shapes = shapes.len(), "decoded geometry");
            write_json(out, &shapes)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<MapConfig> {
    let (store, key) = match path {
        Some(path) => FsConfigStore::for_file(path)?,
        None => (
            FsConfigStore::new().context("failed to open user config dir")?,
            MAP_CONFIG_KEY.to_owned(),
        ),
    };
    let base = store.base().to_path_buf();
    ConfigService::new(store)
        .load_map_config(&key)
        .with_context(|| format!("failed to load config `{key}` from {}", base.display()))?
        .with_context(|| format!("config `{key}` not found in {}", base.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if path.as_os_str() == "-" {
        return serde_json::from_reader(io::stdin().lock()).context("failed to parse stdin");
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn write_json<T: Serialize>(out: Option<&Path>, value: &T) -> Result<()> {
    match out {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
            emit(BufWriter::new(file), value)
        }
        None => emit(io::stdout().lock(), value),
    }
}

fn emit<W: Write, T: Serialize>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
