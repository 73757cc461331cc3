//! Key schema, pressed-key tracking, and host commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Logical keys the puzzle reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Left,
    Right,
    Up,
    Down,
    Swap,
}

/// Input collaborator as the puzzle sees it: held keys and their derived direction.
pub trait InputDevice {
    /// -1 (left), 0, or 1 (right).
    fn direction_x(&self) -> i32;
    /// -1 (up), 0, or 1 (down).
    fn direction_y(&self) -> i32;
    /// Number of physical keys currently held, mapped or not.
    fn pressed_count(&self) -> usize;
    fn is_pressed(&self, key: LogicalKey) -> bool;
}

/// Mapping from terminal key codes to logical keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    bindings: HashMap<KeyCode, LogicalKey>,
}

impl Default for KeySchema {
    /// Arrows, vim (hjkl) and wasd for movement; Space, Enter or x to swap.
    fn default() -> Self {
        let mut schema = Self {
            bindings: HashMap::new(),
        };
        for (code, key) in [
            (KeyCode::Left, LogicalKey::Left),
            (KeyCode::Char('h'), LogicalKey::Left),
            (KeyCode::Char('a'), LogicalKey::Left),
            (KeyCode::Right, LogicalKey::Right),
            (KeyCode::Char('l'), LogicalKey::Right),
            (KeyCode::Char('d'), LogicalKey::Right),
            (KeyCode::Up, LogicalKey::Up),
            (KeyCode::Char('k'), LogicalKey::Up),
            (KeyCode::Char('w'), LogicalKey::Up),
            (KeyCode::Down, LogicalKey::Down),
            (KeyCode::Char('j'), LogicalKey::Down),
            (KeyCode::Char('s'), LogicalKey::Down),
            (KeyCode::Char(' '), LogicalKey::Swap),
            (KeyCode::Enter, LogicalKey::Swap),
            (KeyCode::Char('x'), LogicalKey::Swap),
        ] {
            schema.bind(code, key);
        }
        schema
    }
}

impl KeySchema {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn bind(&mut self, code: KeyCode, key: LogicalKey) {
        self.bindings.insert(normalize(code), key);
    }

    pub fn lookup(&self, code: KeyCode) -> Option<LogicalKey> {
        self.bindings.get(&normalize(code)).copied()
    }
}

/// Letters bind case-insensitively.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Terminal keyboard state.
///
/// Only the not-pressed to pressed edge counts; auto-repeat is dropped. Terminals
/// that never report releases send a press per keystroke, so without release
/// events every press is a fresh edge and replaces the held set.
#[derive(Debug, Clone)]
pub struct Keyboard {
    schema: KeySchema,
    keys: HashMap<KeyCode, bool>,
    release_events: bool,
}

impl Keyboard {
    pub fn new(schema: KeySchema, release_events: bool) -> Self {
        Self {
            schema,
            keys: HashMap::new(),
            release_events,
        }
    }

    pub fn schema(&self) -> &KeySchema {
        &self.schema
    }

    /// Record a key-down. Returns the logical key when the press is actionable.
    pub fn key_down(&mut self, code: KeyCode, repeat: bool) -> Option<LogicalKey> {
        if repeat {
            return None;
        }
        let code = normalize(code);
        if !self.release_events {
            self.keys.clear();
        } else if self.keys.get(&code).copied().unwrap_or(false) {
            return None;
        }
        self.keys.insert(code, true);
        self.schema.lookup(code)
    }

    pub fn key_up(&mut self, code: KeyCode) {
        self.keys.insert(normalize(code), false);
    }

    /// Forget every held key (focus loss, pause).
    pub fn release_all(&mut self) {
        self.keys.clear();
    }

    fn held(&self, key: LogicalKey) -> bool {
        self.keys
            .iter()
            .any(|(code, pressed)| *pressed && self.schema.lookup(*code) == Some(key))
    }
}

impl InputDevice for Keyboard {
    fn direction_x(&self) -> i32 {
        i32::from(self.held(LogicalKey::Right)) - i32::from(self.held(LogicalKey::Left))
    }

    fn direction_y(&self) -> i32 {
        i32::from(self.held(LogicalKey::Down)) - i32::from(self.held(LogicalKey::Up))
    }

    fn pressed_count(&self) -> usize {
        self.keys.values().filter(|pressed| **pressed).count()
    }

    fn is_pressed(&self, key: LogicalKey) -> bool {
        self.held(key)
    }
}

/// Host-level commands, handled outside the puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Pause,
    Restart,
}

/// Map key event to host command.
pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    let KeyEvent { code, modifiers, .. } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    match code {
        KeyCode::Char('c') if modifiers == KeyModifiers::CONTROL => Some(Command::Quit),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc if no_mod => Some(Command::Quit),
        KeyCode::Char('p' | 'P') if no_mod => Some(Command::Pause),
        KeyCode::Char('r' | 'R') if no_mod => Some(Command::Restart),
        _ => None,
    }
}
