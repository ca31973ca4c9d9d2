#![deny(unsafe_code)]
//! CLI binary that drives the star field engine headlessly.
//!
//! Subcommands:
//! - `frame`: run a session and print the last frame's visual attributes
//! - `render`: run a session and write the last frame as a PNG
//! - `replay <seed.json>`: replay a recorded seed file
//! - `params`: print default params and the param schema

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use log::{debug, info};
use starfield_core::seed::DEFAULT_DT_MS;
use starfield_core::{ScheduledTrigger, Seed, Srgb, StarFieldEngine, StarFieldParams};
use starfield_render::snapshot::write_png;
use starfield_render::DEFAULT_BACKGROUND;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "starfield", about = "Headless driver for the ambient star field")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log engine events to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SessionArgs {
    /// Number of particles.
    #[arg(long, default_value_t = 100)]
    count: usize,

    /// Surface width in pixels.
    #[arg(short = 'W', long, default_value_t = 390.0)]
    width: f64,

    /// Surface height in pixels.
    #[arg(short = 'H', long, default_value_t = 844.0)]
    height: f64,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of frame ticks to run.
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// Tick length in milliseconds.
    #[arg(long, default_value_t = DEFAULT_DT_MS)]
    dt: f64,

    /// Engine parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,

    /// JSON file with an array of timed triggers.
    #[arg(long)]
    script: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a session and print the last frame.
    Frame {
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Run a session and write the last frame as a PNG.
    Render {
        #[command(flatten)]
        session: SessionArgs,

        /// Output file path.
        #[arg(short, long, default_value = "starfield.png")]
        output: PathBuf,

        /// Background color as hex.
        #[arg(long, default_value = DEFAULT_BACKGROUND)]
        background: String,
    },
    /// Replay a seed file.
    Replay {
        /// Path to a seed JSON file.
        seed_file: PathBuf,

        /// Also write the last frame as a PNG.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Background color as hex.
        #[arg(long, default_value = DEFAULT_BACKGROUND)]
        background: String,
    },
    /// Print default params and their schema.
    Params,
}

impl SessionArgs {
    fn into_seed(self) -> Result<Seed, CliError> {
        let params: serde_json::Value = serde_json::from_str(&self.params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        let triggers = match &self.script {
            Some(path) => read_script(path)?,
            None => Vec::new(),
        };
        let mut seed = Seed::new(self.count, self.width, self.height, self.seed);
        seed.params = params;
        seed.frames = self.frames;
        seed.dt_ms = self.dt;
        seed.triggers = triggers;
        Ok(seed)
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| CliError::io_at(path, e))
}

fn read_script(path: &Path) -> Result<Vec<ScheduledTrigger>, CliError> {
    let text = read_file(path)?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid trigger script {}: {e}", path.display())))
}

fn read_seed(path: &Path) -> Result<Seed, CliError> {
    let text = read_file(path)?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid seed file {}: {e}", path.display())))
}

fn parse_background(hex: &str) -> Result<Srgb, CliError> {
    Srgb::from_hex(hex).map_err(|e| CliError::Input(e.to_string()))
}

fn run_seed(seed: &Seed) -> Result<StarFieldEngine, CliError> {
    debug!(
        "running {} frames of {:.3} ms with {} triggers",
        seed.frames,
        seed.dt_ms,
        seed.triggers.len()
    );
    Ok(seed.replay()?)
}

fn summary(seed: &Seed, engine: &StarFieldEngine) -> serde_json::Value {
    serde_json::json!({
        "count": engine.field().len(),
        "width": seed.width,
        "height": seed.height,
        "seed": seed.seed,
        "frames": seed.frames,
        "elapsed_ms": engine.elapsed_ms(),
        "ripple": engine.ripple_state(),
        "highlighted": engine.highlights().iter().collect::<Vec<_>>(),
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Params => {
            let info = serde_json::json!({
                "defaults": StarFieldParams::default().to_json(),
                "schema": StarFieldParams::schema(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Frame { session } => {
            let seed = session.into_seed()?;
            let engine = run_seed(&seed)?;
            let frame = engine.frame();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else {
                println!("id\tx\ty\tsize\topacity\tcolor\tjitter");
                for (id, v) in frame.iter().enumerate() {
                    println!(
                        "{id}\t{:.1}\t{:.1}\t{:.2}\t{:.3}\t{}\t{:+.1},{:+.1}",
                        v.x,
                        v.y,
                        v.size,
                        v.opacity,
                        v.color.to_hex(),
                        v.jitter_x,
                        v.jitter_y
                    );
                }
            }
        }
        Command::Render {
            session,
            output,
            background,
        } => {
            let background = parse_background(&background)?;
            let seed = session.into_seed()?;
            let engine = run_seed(&seed)?;
            write_png(&engine.frame(), engine.surface(), background, &output)?;
            info!("wrote {}", output.display());
            if cli.json {
                let mut info = summary(&seed, &engine);
                info["output"] = serde_json::json!(output.display().to_string());
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} stars ({}x{}, {} frames, seed {}) -> {}",
                    seed.count,
                    seed.width,
                    seed.height,
                    seed.frames,
                    seed.seed,
                    output.display()
                );
            }
        }
        Command::Replay {
            seed_file,
            output,
            background,
        } => {
            let background = parse_background(&background)?;
            let seed = read_seed(&seed_file)?;
            let engine = run_seed(&seed)?;
            if let Some(path) = &output {
                write_png(&engine.frame(), engine.surface(), background, path)?;
                info!("wrote {}", path.display());
            }
            let info = summary(&seed, &engine);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let ripple = engine.ripple_state();
                println!(
                    "replayed {} ({} stars, {:.1} ms): ripple {} at {:.3}, {} highlighted",
                    seed_file.display(),
                    engine.field().len(),
                    engine.elapsed_ms(),
                    if ripple.active { "active" } else { "idle" },
                    ripple.progress,
                    engine.highlights().len()
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
