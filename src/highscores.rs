//! Persist the best run to disk (XDG config or ~/.config/panelrise).

use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

const FILENAME: &str = "best";

/// Longest run so far: rows risen, then ticks survived as the tiebreak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct BestRun {
    pub rows: u64,
    pub ticks: u64,
}

/// Returns the path to the best-run file (config dir / panelrise / best).
fn config_path() -> PathBuf {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from(".")),
    };
    base.join("panelrise").join(FILENAME)
}

/// Parse "rows\nticks\n"; anything missing or malformed reads as 0.
fn parse_best(content: &str) -> BestRun {
    let mut lines = content
        .lines()
        .map(|l| l.trim().parse::<u64>().unwrap_or(0));
    BestRun {
        rows: lines.next().unwrap_or(0),
        ticks: lines.next().unwrap_or(0),
    }
}

/// Load the best run from disk. Zero on missing/parse error.
pub fn load_best() -> BestRun {
    fs::read_to_string(config_path())
        .map(|content| parse_best(&content))
        .unwrap_or_default()
}

/// Save the best run to disk. Creates config directory if needed.
pub fn save_best(best: BestRun) -> Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut f = fs::File::create(path)?;
    writeln!(f, "{}", best.rows)?;
    writeln!(f, "{}", best.ticks)?;
    Ok(())
}
