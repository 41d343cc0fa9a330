//! Pointer and keyboard events, and the keyboard shortcut mapping.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in screen coordinates, relative to the displayed canvas box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
}

/// Keys the whiteboard reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Character(char),
    Delete,
    Backspace,
    Escape,
    Enter,
    Other(String),
}

impl Key {
    /// Parse a key name as reported by a windowing layer ("z", "Delete", "Escape").
    pub fn from_name(name: &str) -> Self {
        match name {
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            "Escape" | "Esc" => Key::Escape,
            "Enter" | "Return" => Key::Enter,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Character(c.to_ascii_lowercase()),
                    _ => Key::Other(name.to_string()),
                }
            }
        }
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key press without modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::default())
    }
}

/// Whiteboard commands bound to keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShortcutAction {
    Undo,
    Redo,
    Duplicate,
    Delete,
    CancelText,
}

impl ShortcutAction {
    /// Map a key press to a command, if it is bound.
    pub fn from_key(event: &KeyEvent) -> Option<Self> {
        let mods = event.modifiers;
        match &event.key {
            Key::Character('z') if mods.command() && mods.shift => Some(ShortcutAction::Redo),
            Key::Character('z') if mods.command() => Some(ShortcutAction::Undo),
            Key::Character('d') if mods.command() => Some(ShortcutAction::Duplicate),
            Key::Delete => Some(ShortcutAction::Delete),
            Key::Escape => Some(ShortcutAction::CancelText),
            _ => None,
        }
    }
}
