//! Layout and drawing: board (from the scene graph), sidebar, pause and game-over overlays.

use crate::app::{Board, Screen};
use crate::highscores::BestRun;
use crate::scene::SceneObject;
use crate::theme::Theme;
use crate::tile::{Layer, TileColor};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Terminal columns per tile.
const CELL_WIDTH: i64 = 4;
/// Half-block rows per tile (two per terminal row, via ▀).
const HALF_ROWS_PER_TILE: i64 = 4;

const SIDEBAR_WIDTH: u16 = 24;

/// Duration of the game-over fade (TachyonFX) in ms.
const GAME_OVER_FADE_MS: u32 = 800;

/// Board size in terminal cells including the border.
fn board_outer_size(columns: usize, rows: usize) -> (u16, u16) {
    let w = columns as u16 * CELL_WIDTH as u16;
    let h = rows as u16 * (HALF_ROWS_PER_TILE / 2) as u16;
    (w + 2, h + 2)
}

/// Half-block framebuffer: `None` cells show the board background.
struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Option<Color>>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    fn get(&self, x: usize, y: usize) -> Option<Color> {
        self.cells.get(y * self.width + x).copied().flatten()
    }

    fn paint(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = Some(color);
        }
    }

    /// Pixel rect -> half-block rect `[x0, x1) x [y0, y1)`.
    fn project(object: &SceneObject, tile_size: i64) -> (i64, i64, i64, i64) {
        let x = object.position.x as i64;
        let y = object.position.y as i64;
        let w = object.width as i64;
        let h = object.height as i64;
        (
            (x * CELL_WIDTH).div_euclid(tile_size),
            (y * HALF_ROWS_PER_TILE).div_euclid(tile_size),
            ((x + w) * CELL_WIDTH).div_euclid(tile_size),
            ((y + h) * HALF_ROWS_PER_TILE).div_euclid(tile_size),
        )
    }

    /// Solid tile with a darker right column and bottom row so neighbours stay distinct.
    fn fill_tile(&mut self, object: &SceneObject, tile_size: i64) {
        let (x0, y0, x1, y1) = Self::project(object, tile_size);
        let color = object.sprite.color;
        let edge = darken(color);
        for y in y0..y1 {
            for x in x0..x1 {
                let c = if x == x1 - 1 || y == y1 - 1 { edge } else { color };
                self.paint(x, y, c);
            }
        }
    }

    fn outline(&mut self, object: &SceneObject, tile_size: i64) {
        let (x0, y0, x1, y1) = Self::project(object, tile_size);
        let color = object.sprite.color;
        for x in x0..x1 {
            self.paint(x, y0, color);
            self.paint(x, y1 - 1, color);
        }
        for y in y0..y1 {
            self.paint(x0, y, color);
            self.paint(x1 - 1, y, color);
        }
    }
}

fn darken(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as u16 * 3 / 5) as u8,
            (g as u16 * 3 / 5) as u8,
            (b as u16 * 3 / 5) as u8,
        ),
        other => other,
    }
}

/// True when an active tile is within one tile of the top edge.
fn in_danger(board: &Board) -> bool {
    let size = board.config().tile_size as i32;
    board
        .grid()
        .flatten()
        .any(|t| t.is_active() && t.position.y < size)
}

/// Board inner rect (no border) for the given area; matches draw_game layout.
fn board_rect(area: Rect, board: &Board) -> Rect {
    let config = board.config();
    let (bw, bh) = board_outer_size(config.columns, config.rows);
    let total_w = bw + SIDEBAR_WIDTH;
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(bh) / 2;
    Rect {
        x: x + 1,
        y: y + 1,
        width: bw.saturating_sub(2).min(area.width.saturating_sub(2)),
        height: bh.saturating_sub(2).min(area.height.saturating_sub(2)),
    }
}

/// Create the game-over fade on first call, then advance it by the time since the last frame.
fn apply_game_over_effect(
    frame: &mut Frame,
    board: &Board,
    theme: &Theme,
    area: Rect,
    effect: &mut Option<Effect>,
    process_time: &mut Option<Instant>,
    now: Instant,
) {
    let rect = board_rect(area, board);
    let delta = process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *process_time = Some(now);

    if effect.is_none() {
        *effect = Some(
            fx::fade_to(
                theme.inactive_fg,
                theme.bg,
                (GAME_OVER_FADE_MS, Interpolation::Linear),
            )
            .with_area(rect),
        );
    }
    if let Some(effect) = effect {
        frame.render_effect(effect, rect, TfxDuration::from_millis(delta_ms));
    }
}

/// Draw the current screen. On game over the board fades (unless `no_animation`)
/// under a result popup.
pub fn draw(
    frame: &mut Frame,
    board: &Board,
    theme: &Theme,
    screen: Screen,
    best: BestRun,
    new_record: bool,
    game_over_effect: &mut Option<Effect>,
    effect_process_time: &mut Option<Instant>,
    now: Instant,
    no_animation: bool,
) {
    let area = frame.area();
    draw_game(frame, board, theme, area, best);
    match screen {
        Screen::Playing => {}
        Screen::Paused => draw_pause_overlay(frame, theme, area),
        Screen::GameOver => {
            if !no_animation {
                apply_game_over_effect(
                    frame,
                    board,
                    theme,
                    area,
                    game_over_effect,
                    effect_process_time,
                    now,
                );
            }
            draw_game_over(frame, board, theme, area, best, new_record);
        }
    }
}

/// Draw game: board + sidebar, centred in the full area.
fn draw_game(frame: &mut Frame, board: &Board, theme: &Theme, area: Rect, best: BestRun) {
    let config = board.config();
    let (bw, bh) = board_outer_size(config.columns, config.rows);
    let total_w = bw + SIDEBAR_WIDTH;

    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);

    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(bh.max(SIDEBAR_HEIGHT)),
            Constraint::Fill(1),
        ])
        .split(horiz_chunks[1]);

    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert_chunks[1]);

    let board_area = Rect {
        height: bh.min(inner[0].height),
        ..inner[0]
    };
    draw_board(frame, board, theme, board_area);
    draw_sidebar(frame, board, theme, inner[1], best);
}

fn draw_board(frame: &mut Frame, board: &Board, theme: &Theme, area: Rect) {
    let border = if in_danger(board) {
        Color::Red
    } else {
        theme.div_line
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(theme.bg))
        .title(Span::styled(" panelrise ", theme.title));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let config = board.config();
    let tile_size = config.tile_size as i64;
    let mut canvas = Canvas::new(
        config.columns * CELL_WIDTH as usize,
        config.rows * HALF_ROWS_PER_TILE as usize,
    );
    for object in board.scene().draw_order() {
        match object.layer {
            Layer::Tile => canvas.fill_tile(object, tile_size),
            Layer::Selector => canvas.outline(object, tile_size),
        }
    }

    let buf = frame.buffer_mut();
    for ty in 0..canvas.height / 2 {
        for tx in 0..canvas.width {
            let rx = inner.x + tx as u16;
            let ry = inner.y + ty as u16;
            if rx >= inner.x + inner.width || ry >= inner.y + inner.height {
                continue;
            }
            let top = canvas.get(tx, ty * 2).unwrap_or(theme.bg);
            let bot = canvas.get(tx, ty * 2 + 1).unwrap_or(theme.bg);
            buf[(rx, ry)]
                .set_symbol("▀")
                .set_style(Style::default().fg(top).bg(bot));
        }
    }
}

const SIDEBAR_HEIGHT: u16 = 18;

fn draw_sidebar(frame: &mut Frame, board: &Board, theme: &Theme, area: Rect, best: BestRun) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Stats
            Constraint::Length(1), // gap
            Constraint::Length(3), // Colours
            Constraint::Length(1), // gap
            Constraint::Length(7), // Controls
        ])
        .split(area);

    // --- Stats ---
    let interval = board.config().scroll_interval.as_secs_f64();
    let stats = vec![
        Line::from(vec![
            Span::styled("Rows:  ", title_style),
            Span::styled(board.rows_risen().to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Ticks: ", title_style),
            Span::styled(board.ticks().to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Best:  ", title_style),
            Span::styled(format!("{} ({}t)", best.rows, best.ticks), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Rise:  ", title_style),
            Span::styled(
                format!("{}px / {:.1}s", board.config().stage_movement, interval),
                fg_style,
            ),
        ]),
    ];
    Paragraph::new(stats)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .render(chunks[0], frame.buffer_mut());

    // --- Colours ---
    let colours_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let colours_inner = colours_block.inner(chunks[2]);
    colours_block.render(chunks[2], frame.buffer_mut());
    draw_colour_strip(frame, theme, colours_inner);

    // --- Controls ---
    let help = vec![
        Line::from(Span::styled("←↓↑→ hjkl  Move", fg_style)),
        Line::from(Span::styled("Space/x    Swap", fg_style)),
        Line::from(Span::styled("P          Pause", fg_style)),
        Line::from(Span::styled("R          Restart", fg_style)),
        Line::from(Span::styled("Q / Esc    Quit", fg_style)),
    ];
    Paragraph::new(help)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled("Keys", title_style)),
        )
        .render(chunks[4], frame.buffer_mut());
}

fn draw_colour_strip(frame: &mut Frame, theme: &Theme, area: Rect) {
    let buf = frame.buffer_mut();
    for (i, color) in TileColor::ALL.iter().enumerate() {
        let x = area.x + (i as u16) * 3;
        if x + 1 >= area.x + area.width || area.height == 0 {
            break;
        }
        let style = Style::default().fg(theme.tile_color(*color));
        buf.set_string(x, area.y, "██", style);
    }
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered_popup(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P Resume    Q Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_game_over(
    frame: &mut Frame,
    board: &Board,
    theme: &Theme,
    area: Rect,
    best: BestRun,
    new_record: bool,
) {
    let popup = centered_popup(area, 30, if new_record { 10 } else { 9 });
    let fg = Style::default().fg(theme.main_fg);
    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Rows risen: {} ", board.rows_risen()), fg)),
        Line::from(Span::styled(format!(" Ticks: {} ", board.ticks()), fg)),
        Line::from(Span::styled(format!(" Best: {} rows ", best.rows), fg)),
    ];
    if new_record {
        lines.push(Line::from(Span::styled(
            " New record! ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(Span::styled(" R Restart    Q Quit ", fg)));
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .title(Span::styled(" panelrise ", theme.title)),
    );
    p.render(popup, frame.buffer_mut());
}
