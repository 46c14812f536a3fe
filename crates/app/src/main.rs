use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tilt_card_core::{
    bounds_for, normalize, AppConfig, GyroTilt, HighlightState, PermissionOutcome,
    RawOrientationSample, StaticPlatform, StyleMap, TiltCoordinator, TiltSurface,
};
use tracing_subscriber::EnvFilter;

fn main() -> tilt_card_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { trace, config } => run_replay(&trace, config.as_deref()),
        Commands::Normalize {
            alpha,
            beta,
            gamma,
            rotation,
        } => run_normalize(RawOrientationSample::new(alpha, beta, gamma), rotation),
        Commands::Bounds { landscape } => print_json(&bounds_for(landscape)),
    }
}

fn run_replay(trace_path: &Path, config_path: Option<&Path>) -> tilt_card_core::Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let trace: Trace = serde_json::from_str(&std::fs::read_to_string(trace_path)?)?;
    tracing::info!(
        trace = ?trace_path,
        surfaces = config.surfaces,
        events = trace.events.len(),
        "replaying sensor trace"
    );

    let mut coordinator = TiltCoordinator::new(trace.platform);
    let surfaces: Vec<_> = (0..config.surfaces)
        .map(|_| TiltSurface::new(GyroTilt::new(config.tilt.clone()), Some(StyleMap::new())))
        .collect();
    coordinator.activate(surfaces)?;

    for event in trace.events {
        match event {
            TraceEvent::Orientation(sample) => {
                let delivered = coordinator.on_device_orientation(&sample);
                tracing::debug!(?sample, delivered, "orientation sample");
            }
            TraceEvent::ScreenAngle { angle } => {
                coordinator.platform_mut().set_screen_angle(angle);
            }
            TraceEvent::Viewport { landscape } => coordinator.on_viewport_change(landscape),
            TraceEvent::Pointer { surface, x, y } => {
                coordinator.on_pointer_move(surface, x, y)?;
            }
            TraceEvent::Interaction { grant } => {
                let outcome = if grant {
                    PermissionOutcome::Granted
                } else {
                    PermissionOutcome::Denied
                };
                coordinator.on_user_interaction(|| Ok::<_, std::convert::Infallible>(outcome));
            }
        }
    }

    let report: Vec<SurfaceReport<'_>> = coordinator
        .surfaces()
        .iter()
        .enumerate()
        .map(|(index, surface)| SurfaceReport {
            index,
            highlight: surface.highlight(),
            styles: surface.front(),
        })
        .collect();
    print_json(&report)
}

fn run_normalize(raw: RawOrientationSample, rotation: i32) -> tilt_card_core::Result<()> {
    let canonical = normalize(&raw, rotation);
    if canonical.is_none() {
        tracing::info!(?raw, "sample is missing beta or gamma");
    }
    print_json(&canonical)
}

fn print_json<T: Serialize>(value: &T) -> tilt_card_core::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Recorded session: the device it ran on plus the events in arrival order.
#[derive(Debug, Deserialize)]
struct Trace {
    #[serde(default)]
    platform: StaticPlatform,
    events: Vec<TraceEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TraceEvent {
    Orientation(RawOrientationSample),
    ScreenAngle { angle: Option<i32> },
    Viewport { landscape: bool },
    Pointer { surface: usize, x: f64, y: f64 },
    Interaction { grant: bool },
}

#[derive(Debug, Serialize)]
struct SurfaceReport<'a> {
    index: usize,
    highlight: HighlightState,
    styles: Option<&'a StyleMap>,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Tilt Card orientation tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON sensor trace against the tilt surfaces.
    Replay {
        /// Path to the trace file.
        trace: PathBuf,
        /// Optional JSON configuration overriding the tilt settings.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Normalise a single orientation reading.
    Normalize {
        #[arg(long, allow_negative_numbers = true)]
        alpha: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        beta: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        gamma: Option<f64>,
        /// Screen rotation angle in degrees.
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        rotation: i32,
    },
    /// Print the gyroscope bounds for a viewport orientation.
    Bounds {
        #[arg(long)]
        landscape: bool,
    },
}
