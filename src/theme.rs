//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::tile::TileColor;
use clap::ValueEnum;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

/// One Dark palette and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Tile colours, indexed by `TileColor::index()`: blue, green, purple, red, yellow.
    pub tiles: [Color; 5],
    /// Selector outline.
    pub selector: Color,
    /// Board background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (ticks, rows).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text and the game-over fade.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

const BLUE: Color = Color::Rgb(0x61, 0xAF, 0xEF);
const GREEN: Color = Color::Rgb(0x98, 0xC3, 0x79);
const PURPLE: Color = Color::Rgb(0xC6, 0x78, 0xDD);
const RED: Color = Color::Rgb(0xE0, 0x6C, 0x75);
const YELLOW: Color = Color::Rgb(0xE5, 0xC0, 0x7B);
const CYAN: Color = Color::Rgb(0x56, 0xB6, 0xC2);
const METER_BG: Color = Color::Rgb(0x31, 0x35, 0x3F);
const DIV_LINE: Color = Color::Rgb(0x3F, 0x44, 0x4F);
const MAIN_FG: Color = Color::Rgb(0xAB, 0xB2, 0xBF);
const INACTIVE_FG: Color = Color::Rgb(0x5C, 0x63, 0x70);

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    /// Hardcoded One Dark defaults: exact hex values from onedark.theme.
    pub fn onedark_default() -> Self {
        Self {
            tiles: [BLUE, GREEN, PURPLE, RED, YELLOW],
            selector: CYAN,
            bg: METER_BG,
            div_line: DIV_LINE,
            main_fg: MAIN_FG,
            title: YELLOW,
            inactive_fg: INACTIVE_FG,
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file is missing.
    /// `palette` selects colour variant: Normal (theme), HighContrast, or Colorblind.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override tile colours for high-contrast or colorblind.
    pub fn apply_palette(&mut self, palette: Palette) {
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => {
                self.tiles = [
                    Color::Rgb(0x00, 0x88, 0xFF), // blue
                    Color::Rgb(0x00, 0xFF, 0x00), // green
                    Color::Rgb(0xFF, 0x00, 0xFF), // purple
                    Color::Rgb(0xFF, 0x00, 0x00), // red
                    Color::Rgb(0xFF, 0xFF, 0x00), // yellow
                ];
                self.selector = Color::White;
            }
            Palette::Colorblind => {
                // Tol "vibrant": no red/green pair carries meaning alone
                self.tiles = [
                    Color::Rgb(0x00, 0x77, 0xBB), // blue
                    Color::Rgb(0x00, 0x99, 0x88), // teal
                    Color::Rgb(0xEE, 0x33, 0x77), // magenta
                    Color::Rgb(0xEE, 0x77, 0x33), // orange
                    Color::Rgb(0xBB, 0xBB, 0x00), // yellow
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .and_then(|v| parse_hex(v.trim_matches('"').trim_matches('\'').trim()).ok())
        };
        // Keys match onedark.theme; fallbacks are the same file's hex values.
        Self {
            tiles: [
                get("cpu_box").unwrap_or(BLUE),
                get("mem_box").or_else(|| get("cpu_start")).unwrap_or(GREEN),
                get("net_box").unwrap_or(PURPLE),
                get("cpu_end").or_else(|| get("temp_end")).unwrap_or(RED),
                get("title").or_else(|| get("cpu_mid")).unwrap_or(YELLOW),
            ],
            selector: get("hi_fg").or_else(|| get("proc_misc")).unwrap_or(CYAN),
            bg: get("meter_bg").unwrap_or(METER_BG),
            div_line: get("div_line").unwrap_or(DIV_LINE),
            main_fg: get("main_fg").unwrap_or(MAIN_FG),
            title: get("title").unwrap_or(YELLOW),
            inactive_fg: get("inactive_fg").unwrap_or(INACTIVE_FG),
        }
    }

    #[inline]
    pub fn tile_color(&self, color: TileColor) -> Color {
        self.tiles[color.index()]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return Err(ThemeError::InvalidHex(s.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))
    };
    let (r, g, b) = if s.len() == 6 {
        (channel(0..2)?, channel(2..4)?, channel(4..6)?)
    } else if s.len() == 3 {
        (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17)
    } else {
        return Err(ThemeError::InvalidHex(s.to_string()));
    };
    Ok(Color::Rgb(r, g, b))
}
