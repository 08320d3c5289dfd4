//! Drawerstack CLI: inspect and replay drawer stack behaviour headlessly.
//!
//! Commands:
//! - `resolve`: which presentation a drawer gets at a viewport width
//! - `gesture`: whether a sheet release dismisses or snaps back
//! - `replay`: drive a controller from a TOML script and print the stack
//! - `config`: print the effective configuration

mod logging;
mod script;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use drawerstack_core::gesture::{DragTracker, GestureThresholds};
use drawerstack_core::presentation::resolve_with;
use drawerstack_core::{DrawerConfig, PresentationRequest, SizeToken};

use crate::logging::{LogConfig, LogFormat};
use crate::script::Script;

#[derive(Parser)]
#[command(
    name = "drawerstack",
    version,
    about = "Drawerstack CLI: presentation, gesture, and stack replay tools"
)]
struct Cli {
    /// Controller configuration (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the presentation for a viewport width.
    Resolve {
        /// Viewport width in pixels.
        #[arg(long)]
        width: u32,

        /// `auto`, `fullscreen`, or a size token (`sm`..`full`).
        #[arg(long, default_value = "auto")]
        request: PresentationRequest,

        /// Default size token for side panels.
        #[arg(long)]
        size: Option<SizeToken>,
    },
    /// Evaluate a sheet drag release.
    Gesture {
        /// Release offset in pixels (positive = downward).
        #[arg(long, conflicts_with = "samples")]
        offset: Option<f64>,

        /// Release velocity in px/s.
        #[arg(long, default_value_t = 0.0)]
        velocity: f64,

        /// Pointer samples as `ms:px` pairs, e.g. `0:0,40:60,80:130`.
        #[arg(long)]
        samples: Option<String>,
    },
    /// Replay a TOML script against a fresh controller.
    Replay {
        script: PathBuf,

        /// Emit one JSON report per step instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_log_file(cli.log_file.clone());
    logging::init_logging(&log_config).context("initialising logging")?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve {
            width,
            request,
            size,
        } => run_resolve(&config, width, request, size),
        Commands::Gesture {
            offset,
            velocity,
            samples,
        } => run_gesture(&config, offset, velocity, samples.as_deref()),
        Commands::Replay { script, json } => run_replay(config, &script, json),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DrawerConfig> {
    match path {
        Some(path) => {
            let config = DrawerConfig::load(path)?;
            tracing::info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => Ok(DrawerConfig::default()),
    }
}

fn run_resolve(
    config: &DrawerConfig,
    width: u32,
    request: PresentationRequest,
    size: Option<SizeToken>,
) -> Result<()> {
    let presentation = resolve_with(&config.presentation, width, request, size);
    println!(
        "{} {}px (viewport {width}px, request {request})",
        presentation.mode, presentation.width_px
    );
    Ok(())
}

fn run_gesture(
    config: &DrawerConfig,
    offset: Option<f64>,
    velocity: f64,
    samples: Option<&str>,
) -> Result<()> {
    let thresholds = GestureThresholds::from(&config.gesture);

    let (offset, velocity) = match (offset, samples) {
        (Some(offset), _) => (offset, velocity),
        (None, Some(samples)) => {
            let samples = parse_samples(samples)?;
            let release = track(config, &samples);
            (release.0, release.1)
        }
        (None, None) => bail!("one of --offset or --samples is required"),
    };

    let verdict = thresholds.evaluate(offset, velocity);
    println!("{verdict:?}: offset {offset:.1}px, velocity {velocity:.1}px/s");
    Ok(())
}

/// Parse `ms:px` pairs separated by commas.
fn parse_samples(input: &str) -> Result<Vec<(u64, f64)>> {
    let mut samples = Vec::new();
    for pair in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (ms, px) = pair
            .split_once(':')
            .with_context(|| format!("sample '{pair}' is not ms:px"))?;
        let ms: u64 = ms.trim().parse().with_context(|| format!("bad time in '{pair}'"))?;
        let px: f64 = px.trim().parse().with_context(|| format!("bad offset in '{pair}'"))?;
        if let Some(&(last, _)) = samples.last() {
            if ms < last {
                bail!("sample times must not go backwards ({ms} after {last})");
            }
        }
        samples.push((ms, px));
    }
    if samples.is_empty() {
        bail!("--samples needs at least one ms:px pair");
    }
    Ok(samples)
}

/// Feed samples through a tracker and release at the last timestamp.
fn track(config: &DrawerConfig, samples: &[(u64, f64)]) -> (f64, f64) {
    let mut tracker = DragTracker::new(&config.gesture);
    let start = samples[0].0;
    tracker.begin(start);
    for &(ms, px) in samples {
        tracker.push(px, ms);
    }
    let end = samples.last().map_or(start, |s| s.0);
    let release = tracker.release(end);
    (release.offset_px, release.velocity_px_per_sec)
}

fn run_replay(config: DrawerConfig, path: &Path, json: bool) -> Result<()> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    let script = Script::parse(&source)?;
    tracing::info!(steps = script.steps.len(), path = %path.display(), "replaying script");

    let reports = script::replay(&script, config)?;
    for report in &reports {
        if json {
            println!("{}", serde_json::to_string(report)?);
        } else {
            print!("{}", report.render_text());
        }
    }
    Ok(())
}
