//! panelrise: rising-stack tile-swap puzzle in the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use panelrise::app::{App, HostOptions};
use panelrise::config::GameConfig;
use panelrise::theme::{Palette, Theme};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let theme = Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let defaults = GameConfig::default();
    // Start the cursor and the filled stack where they fit a resized grid.
    let config = GameConfig {
        rows: args.rows,
        columns: args.columns,
        initial_rows: defaults.initial_rows.min(args.rows / 2),
        selector_start: (
            defaults.selector_start.0.min(args.columns.saturating_sub(2)),
            defaults.selector_start.1.min(args.rows.saturating_sub(1)),
        ),
        scroll_interval: Duration::from_millis(args.scroll_interval_ms),
        seed: args.seed,
        ..defaults
    };
    let options = HostOptions {
        frame_rate: args.frame_rate,
        no_animation: args.no_animation,
    };
    let mut app = App::new(config, theme, options)?;
    app.run()?;
    Ok(())
}

/// Log to `path` when given; otherwise stay silent so the TUI owns the terminal.
/// Filter via `RUST_LOG`, default `info`.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Rising-stack tile-swap puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "panelrise",
    version,
    about = "Rising-stack tile-swap puzzle in the terminal. Keep the stack below the top edge.",
    long_about = "panelrise is a terminal puzzle in the rising-panel style.\n\n\
        The stack of coloured tiles rises one step every tick. Move the two-tile cursor and \
        swap the pair under it. A new row slides in at the bottom each time a row leaves the \
        top; the game ends when a tile touches the top edge.\n\n\
        CONTROLS:\n  Arrows / hjkl / wasd  Move    Space / Enter / x  Swap\n  \
        P  Pause    R  Restart (after game over)    Q / Esc  Quit\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Grid height in tiles.
    #[arg(long, default_value = "8", value_name = "ROWS")]
    pub rows: usize,

    /// Grid width in tiles.
    #[arg(long, default_value = "6", value_name = "COLS")]
    pub columns: usize,

    /// Seed for tile colours and ids; random if not set.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Time between scroll ticks in ms.
    #[arg(long, default_value = "1000", value_name = "MS")]
    pub scroll_interval_ms: u64,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write logs to this file (RUST_LOG filters, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Disable the game-over fade.
    #[arg(long)]
    pub no_animation: bool,

    /// Target render frames per second.
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub frame_rate: f64,
}
