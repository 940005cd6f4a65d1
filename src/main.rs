//! Push-up counter for recorded videos and live cameras.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use pushup_counter::{
    app::{GuiMode, PushUpApp},
    config::Config,
    pose_detection::YoloPoseDetector,
    profile::BodySide,
    video::VideoSource,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Start a session directly (left, right, front) instead of the menu
    #[arg(short, long, value_parser = parse_side)]
    side: Option<BodySide>,

    /// Video file to process (requires --side)
    #[arg(short, long, requires = "side")]
    video: Option<PathBuf>,

    /// Camera index to use instead of a video (requires --side)
    #[arg(long, requires = "side", conflicts_with = "video")]
    cam: Option<i32>,

    /// Folder with L, R and F sample video subfolders
    #[arg(long)]
    videos_dir: Option<PathBuf>,

    /// Path to the YOLOv8-pose ONNX model
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Angle below which the arms count as bent
    #[arg(long)]
    min_angle: Option<f64>,

    /// Angle above which the arms count as extended
    #[arg(long)]
    max_angle: Option<f64>,

    /// Run without a window (requires --side)
    #[arg(long, requires = "side")]
    headless: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn parse_side(value: &str) -> std::result::Result<BodySide, String> {
    value.parse().map_err(|e: pushup_counter::Error| e.to_string())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("PushUp Counter");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Command line overrides
    if let Some(dir) = args.videos_dir {
        config.video.directory = dir;
    }
    if let Some(model) = args.model {
        config.model.path = model;
    }
    if let Some(min_angle) = args.min_angle {
        config.counter.min_angle = min_angle;
    }
    if let Some(max_angle) = args.max_angle {
        config.counter.max_angle = max_angle;
    }
    config.validate().context("Invalid configuration")?;

    let detector = YoloPoseDetector::new(&config.model).context("Failed to load pose model")?;
    let gui_mode = if args.headless { GuiMode::None } else { GuiMode::Window };
    let mut app = PushUpApp::new(config, gui_mode, detector)?;

    // Single session or interactive menu
    match args.side {
        Some(side) => {
            let summary = match (args.video, args.cam) {
                (Some(path), _) => app.run_session(side, &VideoSource::File(path))?,
                (None, Some(index)) => app.run_session(side, &VideoSource::Camera(index))?,
                (None, None) => app.run_sample(side)?,
            };
            println!("Push-ups: {}", summary.repetitions);
        }
        None => app.run_menu()?,
    }

    Ok(())
}
