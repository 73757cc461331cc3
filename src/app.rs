//! App: terminal init, main loop, frame timing and key routing.

use crate::assets::SpriteAtlas;
use crate::config::{ConfigError, GameConfig};
use crate::controller::{Puzzle, Tickable};
use crate::highscores::{self, BestRun};
use crate::input::{Command, KeySchema, Keyboard, key_to_command};
use crate::scene::SceneGraph;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use log::{info, warn};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// The puzzle as the terminal host runs it.
pub type Board = Puzzle<SceneGraph, SpriteAtlas>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    Paused,
    GameOver,
}

/// Host-side options that never reach the puzzle.
#[derive(Debug, Clone, Copy)]
pub struct HostOptions {
    /// Target render frames per second.
    pub frame_rate: f64,
    /// Skip the game-over fade.
    pub no_animation: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            no_animation: false,
        }
    }
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    options: HostOptions,
    board: Board,
    keyboard: Keyboard,
    screen: Screen,
    best: BestRun,
    new_record: bool,
    game_over_effect: Option<Effect>,
    game_over_effect_process_time: Option<Instant>,
}

fn new_board(config: &GameConfig, theme: &Theme) -> Result<Board, ConfigError> {
    Puzzle::new(
        config.clone(),
        SceneGraph::new(),
        SpriteAtlas::from_theme(theme),
    )
}

impl App {
    pub fn new(config: GameConfig, theme: Theme, options: HostOptions) -> Result<Self> {
        let board = new_board(&config, &theme)?;
        Ok(Self {
            board,
            keyboard: Keyboard::new(KeySchema::default(), false),
            screen: Screen::Playing,
            best: highscores::load_best(),
            new_record: false,
            game_over_effect: None,
            game_over_effect_process_time: None,
            config,
            theme,
            options,
        })
    }

    fn reset_game(&mut self) -> Result<()> {
        self.board = new_board(&self.config, &self.theme)?;
        self.keyboard.release_all();
        self.screen = Screen::Playing;
        self.new_record = false;
        self.game_over_effect = None;
        self.game_over_effect_process_time = None;
        info!("restarted");
        Ok(())
    }

    /// Record the finished run and persist it if it beats the best.
    fn finish_run(&mut self) {
        self.screen = Screen::GameOver;
        self.keyboard.release_all();
        let run = BestRun {
            rows: self.board.rows_risen(),
            ticks: self.board.ticks(),
        };
        if run > self.best {
            self.best = run;
            self.new_record = true;
            if let Err(e) = highscores::save_best(run) {
                warn!("could not save best run: {e:#}");
            }
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Release events need the kitty keyboard protocol.
        let release_events =
            crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
        if release_events {
            let _ = execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            );
        }
        info!("key release events: {release_events}");
        self.keyboard = Keyboard::new(KeySchema::default(), release_events);

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        if release_events {
            let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        }
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.options.frame_rate.max(1.0));
        let mut last_update = Instant::now();
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &self.board,
                    &self.theme,
                    self.screen,
                    self.best,
                    self.new_record,
                    &mut self.game_over_effect,
                    &mut self.game_over_effect_process_time,
                    now,
                    self.options.no_animation,
                )
            })?;

            let timeout = frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) => {
                            if self.handle_key(key)? {
                                return Ok(());
                            }
                        }
                        Event::FocusLost => self.keyboard.release_all(),
                        _ => {}
                    }
                }
            }

            // Paused time is dropped, not replayed on resume.
            let tick = Instant::now();
            let delta = tick.saturating_duration_since(last_update);
            last_update = tick;
            if self.screen == Screen::Playing {
                let fps = if delta.is_zero() {
                    self.options.frame_rate
                } else {
                    1.0 / delta.as_secs_f64()
                };
                self.board.on_update(delta, fps);
                if self.board.is_game_over() {
                    self.finish_run();
                }
            }
        }
    }

    /// Route one key event. Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.kind {
            KeyEventKind::Release => {
                self.keyboard.key_up(key.code);
                return Ok(false);
            }
            KeyEventKind::Repeat => return Ok(false),
            KeyEventKind::Press => {}
        }

        if let Some(command) = key_to_command(key) {
            match (command, self.screen) {
                (Command::Quit, _) => return Ok(true),
                (Command::Pause, Screen::Playing) => {
                    self.keyboard.release_all();
                    self.screen = Screen::Paused;
                }
                (Command::Pause, Screen::Paused) => self.screen = Screen::Playing,
                (Command::Restart, Screen::GameOver) => self.reset_game()?,
                _ => {}
            }
            return Ok(false);
        }

        if self.screen != Screen::Playing {
            return Ok(false);
        }
        if let Some(logical) = self.keyboard.key_down(key.code, false) {
            self.board.on_key_down(logical, &self.keyboard);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    fn app() -> App {
        let config = GameConfig {
            seed: Some(11),
            ..GameConfig::default()
        };
        let board = new_board(&config, &Theme::default()).expect("valid config");
        App {
            board,
            keyboard: Keyboard::new(KeySchema::default(), true),
            screen: Screen::Playing,
            best: BestRun::default(),
            new_record: false,
            game_over_effect: None,
            game_over_effect_process_time: None,
            config,
            theme: Theme::default(),
            options: HostOptions::default(),
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            kind: KeyEventKind::Release,
            ..KeyEvent::from(code)
        }
    }

    #[test]
    fn test_press_moves_selector() {
        let mut app = app();
        assert!(!app.handle_key(press(KeyCode::Left)).unwrap());
        assert_eq!(app.board.selector().index(), (1, 4));
    }

    #[test]
    fn test_repeated_presses_without_release_events() {
        let mut app = app();
        app.keyboard = Keyboard::new(KeySchema::default(), false);
        let before: Vec<_> = app.board.grid().flatten().cloned().collect();
        for _ in 0..3 {
            app.handle_key(press(KeyCode::Right)).unwrap();
        }
        assert_eq!(app.board.selector().index(), (4, 4));

        for _ in 0..3 {
            app.handle_key(press(KeyCode::Left)).unwrap();
        }
        app.handle_key(press(KeyCode::Char(' '))).unwrap();
        app.handle_key(press(KeyCode::Char(' '))).unwrap();
        let after: Vec<_> = app.board.grid().flatten().cloned().collect();
        assert_eq!(app.board.selector().index(), (1, 4));
        assert_eq!(after, before);
    }

    #[test]
    fn test_two_held_keys_block_movement() {
        let mut app = app();
        app.handle_key(press(KeyCode::Left)).unwrap();
        app.handle_key(press(KeyCode::Up)).unwrap();
        assert_eq!(app.board.selector().index(), (1, 4));
        app.handle_key(release(KeyCode::Left)).unwrap();
        app.handle_key(release(KeyCode::Up)).unwrap();
        app.handle_key(press(KeyCode::Up)).unwrap();
        assert_eq!(app.board.selector().index(), (1, 3));
    }

    #[test]
    fn test_repeat_is_ignored() {
        let mut app = app();
        let repeat = KeyEvent {
            kind: KeyEventKind::Repeat,
            ..KeyEvent::from(KeyCode::Right)
        };
        app.handle_key(repeat).unwrap();
        assert_eq!(app.board.selector().index(), (2, 4));
    }

    #[test]
    fn test_pause_blocks_moves() {
        let mut app = app();
        app.handle_key(press(KeyCode::Char('p'))).unwrap();
        assert_eq!(app.screen, Screen::Paused);
        app.handle_key(press(KeyCode::Left)).unwrap();
        assert_eq!(app.board.selector().index(), (2, 4));
        app.handle_key(press(KeyCode::Char('p'))).unwrap();
        assert_eq!(app.screen, Screen::Playing);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(app.handle_key(press(KeyCode::Char('q'))).unwrap());
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut app = app();
        app.board.advance_stage();
        app.handle_key(press(KeyCode::Char('r'))).unwrap();
        assert_eq!(app.board.ticks(), 1);

        while !app.board.is_game_over() {
            app.board.advance_stage();
        }
        app.screen = Screen::GameOver;
        app.handle_key(press(KeyCode::Char('r'))).unwrap();
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(app.board.ticks(), 0);
        assert!(!app.board.is_game_over());
    }
}
