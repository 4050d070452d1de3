//! Visual styling for the REPL console
//!
//! This module provides the console's small visual vocabulary:
//! - Line styles (normal output, dimmed echo, error alert)
//! - The phosphor palette mapping styles to display colors
//! - Prompt, echo and error prefixes
//! - The startup banner

use hal::DisplayColor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Glyph drawn after the input line contents
pub const CURSOR_GLYPH: char = '_';

/// Prompt drawn to the left of the input line
pub const PROMPT: &str = ">>> ";

/// Prefix of an echoed submission in the transcript
pub const ECHO_PREFIX: &str = "> ";

/// Prefix of an evaluation error in the transcript
pub const ERROR_PREFIX: &str = "Err: ";

/// Console style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Normal output
    Normal,
    /// Echoed input and banner text
    Dim,
    /// Evaluation errors
    Error,
}

/// A palette entry, written as `"#RRGGBB"` in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor(pub DisplayColor);

impl TryFrom<String> for PaletteColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value
            .strip_prefix('#')
            .or_else(|| value.strip_prefix("0x"))
            .unwrap_or(&value);
        if hex.len() != 6 {
            return Err(format!("expected a #RRGGBB color, got {:?}", value));
        }
        u32::from_str_radix(hex, 16)
            .map(|rgb| Self(DisplayColor::from_rgb(rgb)))
            .map_err(|_| format!("expected a #RRGGBB color, got {:?}", value))
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0.rgb())
    }
}

impl Serialize for PaletteColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PaletteColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Style to color mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub normal: PaletteColor,
    pub dim: PaletteColor,
    pub error: PaletteColor,
}

impl Palette {
    /// Green phosphor on black
    pub const PHOSPHOR: Self = Self {
        normal: PaletteColor(DisplayColor::from_rgb(0x00FF00)),
        dim: PaletteColor(DisplayColor::from_rgb(0x005500)),
        error: PaletteColor(DisplayColor::from_rgb(0xFF0000)),
    };

    /// Color used to draw a style
    pub fn color(&self, style: Style) -> DisplayColor {
        match style {
            Style::Normal => self.normal.0,
            Style::Dim => self.dim.0,
            Style::Error => self.error.0,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::PHOSPHOR
    }
}

/// Styled text segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText {
    pub text: String,
    pub style: Style,
}

impl StyledText {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn normal(text: impl Into<String>) -> Self {
        Self::new(text, Style::Normal)
    }

    pub fn dim(text: impl Into<String>) -> Self {
        Self::new(text, Style::Dim)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Style::Error)
    }

    /// Echo of a submitted line
    pub fn echo(line: &str) -> Self {
        Self::dim(format!("{}{}", ECHO_PREFIX, line))
    }

    /// Alert line for an evaluation error
    pub fn alert(message: &str) -> Self {
        Self::error(format!("{}{}", ERROR_PREFIX, message))
    }
}

/// Startup banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    lines: Vec<String>,
}

impl Banner {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The banner shown on power-up
    pub fn default_repl() -> Self {
        Self::from_lines(["PYTHON REPL", "READY..."])
    }
}

impl Default for Banner {
    fn default() -> Self {
        Self::default_repl()
    }
}
