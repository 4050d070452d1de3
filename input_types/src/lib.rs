#![no_std]

//! # Input Types
//!
//! This crate defines the logical key tokens consumed by the REPL console.
//!
//! ## Philosophy
//!
//! - **Tokens, not scan codes**: The console only ever sees decoded, debounced keys
//! - **Small and closed**: Printable characters plus four named control keys
//! - **Testable**: Tokens are serializable and can be injected for testing
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - Raw hardware scan codes (see the `hal` crate)
//! - A key queue; one token is produced per poll and never buffered
//! - Navigation keys, function layers or chords

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Logical key token
///
/// Exactly one token is produced per poll cycle of the key decoder.
/// `None` means "no event this poll".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogicalKey {
    /// A single printable character
    Char(char),
    /// Submit the input line
    Enter,
    /// Delete the last character of the input line (the `DEL` legend)
    Backspace,
    /// Indent (two spaces)
    Tab,
    /// A single space
    Space,
    /// No event this poll
    #[default]
    None,
}

impl LogicalKey {
    /// Returns true if this token carries no event
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns true if this token carries an event
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Returns the character if this is a printable key
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{}", c),
            Self::Enter => write!(f, "ENTER"),
            Self::Backspace => write!(f, "DEL"),
            Self::Tab => write!(f, "TAB"),
            Self::Space => write!(f, "SPACE"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Modifier keys
///
/// Bitflags representing the modifier keys of the device keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self { bits: 0 };
    /// Shift key
    pub const SHIFT: Self = Self { bits: 1 << 0 };
    /// Function layer key
    pub const FN: Self = Self { bits: 1 << 1 };
    /// Control key
    pub const CTRL: Self = Self { bits: 1 << 2 };
    /// Option key
    pub const OPT: Self = Self { bits: 1 << 3 };
    /// Alt key
    pub const ALT: Self = Self { bits: 1 << 4 };

    /// Creates a new modifier set with no modifiers
    pub fn none() -> Self {
        Self::NONE
    }

    /// Creates a new modifier set from bits
    pub fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    /// Returns the raw bits
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Adds a modifier
    pub fn with(mut self, other: Modifiers) -> Self {
        self.bits |= other.bits;
        self
    }

    /// Removes a modifier
    pub fn without(mut self, other: Modifiers) -> Self {
        self.bits &= !other.bits;
        self
    }

    /// Checks if a modifier is present
    pub fn contains(&self, other: Modifiers) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks if Shift is pressed
    pub fn is_shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }

    /// Checks if any modifier other than Shift is pressed
    ///
    /// Such chords select a keyboard layer the console does not use.
    pub fn is_layer(&self) -> bool {
        self.without(Self::SHIFT).bits != 0
    }

    /// Returns true if no modifiers are pressed
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let mut parts = Vec::new();
        for (flag, name) in [
            (Self::FN, "Fn"),
            (Self::CTRL, "Ctrl"),
            (Self::OPT, "Opt"),
            (Self::ALT, "Alt"),
            (Self::SHIFT, "Shift"),
        ] {
            if self.contains(flag) {
                parts.push(name);
            }
        }
        write!(f, "{}", parts.join("+"))
    }
}
