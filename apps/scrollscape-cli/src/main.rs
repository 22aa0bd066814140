use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use scrollscape_input::{ScrollState, Viewport};
use scrollscape_kernel::{FrameInput, Scene, SceneClock, SceneConfig};
use scrollscape_render::{DebugTextRenderer, Renderer};
use scrollscape_tools::{SceneInspector, SceneSummary};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scrollscape-cli", about = "Headless tools for the scroll scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log filter, e.g. `scrollscape_kernel=trace` (overrides --verbose)
    #[arg(long)]
    log_level: Option<String>,

    /// Scene configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info and the effective configuration
    Info,
    /// Animate the scene over a scripted scroll sweep
    Simulate(SimulateArgs),
    /// Load and validate a configuration file
    CheckConfig {
        path: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
struct SimulateArgs {
    /// Number of frames to run
    #[arg(short, long, default_value = "60")]
    frames: u32,
    /// Seconds per frame
    #[arg(long, default_value = "0.016")]
    dt: f32,
    /// Viewport width in logical pixels
    #[arg(long, default_value = "1280")]
    width: f32,
    /// Viewport height in logical pixels
    #[arg(long, default_value = "720")]
    height: f32,
    /// Scroll offset on the first frame
    #[arg(long, default_value = "0")]
    scroll_from: f32,
    /// Scroll offset on the last frame; defaults to the bottom of the page
    #[arg(long)]
    scroll_to: Option<f32>,
    /// Cursor x in logical pixels; defaults to the viewport center
    #[arg(long)]
    cursor_x: Option<f32>,
    /// Cursor y in logical pixels; defaults to the viewport center
    #[arg(long)]
    cursor_y: Option<f32>,
    /// Print every Nth frame
    #[arg(long, default_value = "10")]
    every: u32,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
    /// Include particles in the final text dump
    #[arg(long)]
    particles: bool,
}

#[derive(Debug, Clone, Serialize)]
struct FrameRecord {
    frame: u64,
    elapsed: f32,
    scroll_y: f32,
    summary: SceneSummary,
}

/// Run the sweep and return the scene after the last frame plus every
/// `every`th frame record (the last frame is always included).
fn simulate(config: &SceneConfig, args: &SimulateArgs) -> (Scene, Vec<FrameRecord>) {
    let _span = tracing::info_span!("simulate", frames = args.frames).entered();
    let mut scene = Scene::new(config);
    let viewport = Viewport::new(args.width, args.height, 1.0, config.max_pixel_ratio);
    let sections = config.section_count;
    let mut scroll = ScrollState::default();
    let mut clock = SceneClock::start(config.motion.max_frame_delta);
    let pointer = viewport.pointer_at(
        args.cursor_x.unwrap_or(args.width * 0.5),
        args.cursor_y.unwrap_or(args.height * 0.5),
    );

    let from = args.scroll_from;
    let to = args
        .scroll_to
        .unwrap_or_else(|| ScrollState::max_offset(&viewport, sections));
    let every = args.every.max(1) as u64;
    let last = args.frames.saturating_sub(1) as u64;
    let mut records = Vec::new();

    for i in 0..args.frames {
        let t = if args.frames > 1 {
            i as f32 / (args.frames - 1) as f32
        } else {
            1.0
        };
        scroll.set_offset(from + (to - from) * t, &viewport, sections);

        let time = clock.advance_to(i as f32 * args.dt);
        let stats = scene.animate(&FrameInput {
            elapsed: time.elapsed,
            delta: time.delta,
            scroll_y: scroll.offset(),
            viewport_height: viewport.height,
            pointer,
        });

        if time.frame_index % every == 0 || time.frame_index == last {
            records.push(FrameRecord {
                frame: time.frame_index,
                elapsed: time.elapsed,
                scroll_y: scroll.offset(),
                summary: SceneInspector::summary(&scene, &stats),
            });
        }
    }

    tracing::debug!(records = records.len(), "simulation finished");
    (scene, records)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SceneConfig> {
    let config = match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    config.validate().context("invalid scene configuration")?;
    Ok(config)
}

/// `--log-level` wins, then `RUST_LOG`, then `--verbose`.
fn log_filter(verbose: bool, log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" })),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, cli.log_level.as_deref()))
        .init();

    match cli.command {
        Commands::Info => {
            let config = load_config(cli.config.as_deref())?;
            let scene = Scene::new(&config);
            println!("scrollscape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", scrollscape_render::crate_info());
            println!("assets: {}", scrollscape_assets::crate_info());
            println!("tools: {}", scrollscape_tools::crate_info());
            println!(
                "scene: sections={} particles={} objects={}",
                scene.sections().len(),
                scene.particles().len(),
                scene.object_count()
            );
            println!("---");
            print!("{}", config.to_yaml_string()?);
        }
        Commands::Simulate(args) => {
            let config = load_config(cli.config.as_deref())?;
            let (scene, records) = simulate(&config, &args);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    println!(
                        "frame {} t={:.3}s scroll={:.1}",
                        record.frame, record.elapsed, record.scroll_y
                    );
                    println!("{}", record.summary);
                }
                let renderer = DebugTextRenderer::new().with_particles(args.particles);
                print!("{}", renderer.render(&scene));
            }
        }
        Commands::CheckConfig { path } => {
            let config = load_config(Some(path.as_path()))?;
            println!("{}: OK", path.display());
            print!("{}", config.to_yaml_string()?);
        }
    }

    Ok(())
}
