//! Input device seam and key/button definitions.
//!
//! Low-level mouse and keyboard event encoding lives outside this crate.
//! The interaction sequencer drives an [`InputDevice`] in strict order.
//!
//! # Example
//!
//! ```ignore
//! use cdp_element::{Key, MouseButton};
//!
//! element.click(MouseButton::Left).await?;
//! element.press(Key::Enter).await?;
//! element.press(Key::Char('a')).await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// ============================================================================
// InputDevice
// ============================================================================

/// Mouse and keyboard driver for one page.
#[async_trait]
pub trait InputDevice: Send + Sync {
    /// Moves the pointer to `(x, y)` in `steps` intermediate moves.
    async fn move_mouse(&self, x: f64, y: f64, steps: u32) -> Result<()>;

    /// Presses and releases `button` at the current pointer position.
    async fn mouse_button(&self, button: MouseButton) -> Result<()>;

    /// Presses and releases `key` on the focused element.
    async fn key(&self, key: Key) -> Result<()>;

    /// Inserts `text` into the focused element without key events.
    async fn insert_text(&self, text: &str) -> Result<()>;
}

// ============================================================================
// MouseButton
// ============================================================================

/// Mouse button as named by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Primary button.
    #[default]
    Left,
    /// Wheel button.
    Middle,
    /// Secondary button (context menu).
    Right,
    /// Browser back button.
    Back,
    /// Browser forward button.
    Forward,
}

impl MouseButton {
    /// Returns the protocol name of the button.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Middle => "middle",
            Self::Right => "right",
            Self::Back => "back",
            Self::Forward => "forward",
        }
    }
}

// ============================================================================
// Key
// ============================================================================

/// Keyboard keys for [`Element::press`](crate::Element::press).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // ========================================================================
    // Navigation & Control
    // ========================================================================
    /// Enter/Return key
    Enter,
    /// Tab key
    Tab,
    /// Escape key
    Escape,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Space bar
    Space,

    // ========================================================================
    // Arrow Keys
    // ========================================================================
    /// Arrow Up
    ArrowUp,
    /// Arrow Down
    ArrowDown,
    /// Arrow Left
    ArrowLeft,
    /// Arrow Right
    ArrowRight,

    // ========================================================================
    // Page Navigation
    // ========================================================================
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,

    // ========================================================================
    // Characters
    // ========================================================================
    /// Any printable character.
    Char(char),
}

/// Event properties of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyProperties {
    /// `key` value (e.g. `"Enter"`, `"a"`).
    pub key: String,
    /// `code` value (e.g. `"Enter"`, `"KeyA"`).
    pub code: String,
    /// Legacy `keyCode`.
    pub key_code: u32,
    /// Whether the key produces text.
    pub printable: bool,
}

impl Key {
    /// Returns the event properties for this key.
    #[must_use]
    pub fn properties(self) -> KeyProperties {
        let named = |key: &str, code: &str, key_code: u32, printable: bool| KeyProperties {
            key: key.to_string(),
            code: code.to_string(),
            key_code,
            printable,
        };

        match self {
            Key::Enter => named("Enter", "Enter", 13, false),
            Key::Tab => named("Tab", "Tab", 9, false),
            Key::Escape => named("Escape", "Escape", 27, false),
            Key::Backspace => named("Backspace", "Backspace", 8, false),
            Key::Delete => named("Delete", "Delete", 46, false),
            Key::Space => named(" ", "Space", 32, true),
            Key::ArrowUp => named("ArrowUp", "ArrowUp", 38, false),
            Key::ArrowDown => named("ArrowDown", "ArrowDown", 40, false),
            Key::ArrowLeft => named("ArrowLeft", "ArrowLeft", 37, false),
            Key::ArrowRight => named("ArrowRight", "ArrowRight", 39, false),
            Key::Home => named("Home", "Home", 36, false),
            Key::End => named("End", "End", 35, false),
            Key::PageUp => named("PageUp", "PageUp", 33, false),
            Key::PageDown => named("PageDown", "PageDown", 34, false),
            Key::Char(c) => {
                let upper = c.to_ascii_uppercase();
                let (code, key_code) = if c.is_ascii_alphabetic() {
                    (format!("Key{upper}"), upper as u32)
                } else if c.is_ascii_digit() {
                    (format!("Digit{c}"), c as u32)
                } else {
                    (String::new(), 0)
                };
                KeyProperties {
                    key: c.to_string(),
                    code,
                    key_code,
                    printable: true,
                }
            }
        }
    }

    /// Returns whether this key produces printable output.
    #[inline]
    #[must_use]
    pub fn is_printable(self) -> bool {
        matches!(self, Key::Space | Key::Char(_))
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        match c {
            '\n' | '\r' => Key::Enter,
            '\t' => Key::Tab,
            ' ' => Key::Space,
            other => Key::Char(other),
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.properties().key)
    }
}

// ============================================================================
// Tests
// ============================================================================
