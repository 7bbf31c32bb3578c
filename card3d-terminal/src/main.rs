/// Card3D Terminal - Interactive playing card
///
/// Hover the card with the mouse to tilt it, hold the button to lift it.
/// Controls:
///   - F: Flip the card
///   - C: Flip and change to a different card
///   - Q/ESC: Quit

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use card3d_core::{CardConfig, CardWidget};
use card3d_terminal::{viewport_px, AppOptions, TerminalApp};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "card3d-terminal", about = "Interactive 3D playing card in the terminal")]
struct Cli {
    /// Card tuning file (`key = value` lines)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Face identifier; repeat for each card in the deck
    #[arg(long = "face")]
    faces: Vec<String>,

    /// Pixels per terminal column when choosing the mobile/desktop size
    #[arg(long, default_value_t = 8.0)]
    cell_px: f32,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log: Option<PathBuf>,
}

fn default_faces() -> Vec<String> {
    (1..=11).map(|i| format!("/front/card{i:02}.jpg")).collect()
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log {
        init_logging(path)?;
    }

    let config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            CardConfig::parse(&text).with_context(|| format!("invalid config {}", path.display()))?
        }
        None => CardConfig::default(),
    };

    let faces = if cli.faces.is_empty() {
        default_faces()
    } else {
        cli.faces
    };

    let (columns, _) = crossterm::terminal::size().context("failed to query terminal size")?;
    let widget = CardWidget::new(config, faces, viewport_px(columns, cli.cell_px), rand::random())?;
    tracing::info!(face = widget.controller().current_face(), "card3d-terminal starting");

    let options = AppOptions {
        cell_px: cli.cell_px,
        target_fps: cli.fps,
    };
    let mut app = TerminalApp::new(widget, options)?;
    app.run()?;

    Ok(())
}
