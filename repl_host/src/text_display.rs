//! Text display
//!
//! Stands in for the LCD: keeps the last transcript and input line and
//! renders them as a plain-text frame.

use console_core::PROMPT;
use hal::{ConsoleDisplay, DisplayColor};

/// In-memory console display
#[derive(Debug, Clone)]
pub struct TextDisplay {
    transcript: String,
    color: DisplayColor,
    input: String,
    /// Transcript changed since the last frame was taken
    dirty: bool,
    /// Input line changed since the last frame was taken
    input_stale: bool,
    scrollback_renders: usize,
}

impl TextDisplay {
    pub fn new() -> Self {
        Self {
            transcript: String::new(),
            color: DisplayColor::BLACK,
            input: String::new(),
            dirty: false,
            input_stale: false,
            scrollback_renders: 0,
        }
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn color(&self) -> DisplayColor {
        self.color
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// How many times the transcript was drawn
    pub fn scrollback_renders(&self) -> usize {
        self.scrollback_renders
    }

    /// Transcript followed by the prompt line
    pub fn frame(&self) -> String {
        let mut out = String::with_capacity(self.transcript.len() + self.input.len() + 8);
        if !self.transcript.is_empty() {
            out.push_str(&self.transcript);
            out.push('\n');
        }
        out.push_str(PROMPT);
        out.push_str(&self.input);
        out
    }

    /// The frame, if the transcript changed since the last take
    pub fn take_frame(&mut self) -> Option<String> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.input_stale = false;
        Some(self.frame())
    }

    /// The frame, if anything changed since the last take
    pub fn take_pending_frame(&mut self) -> Option<String> {
        if !self.dirty && !self.input_stale {
            return None;
        }
        self.dirty = false;
        self.input_stale = false;
        Some(self.frame())
    }
}

impl Default for TextDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleDisplay for TextDisplay {
    fn render_scrollback(&mut self, text: &str, color: DisplayColor) {
        self.transcript = text.to_string();
        self.color = color;
        self.dirty = true;
        self.scrollback_renders += 1;
    }

    fn render_input_line(&mut self, text: &str) {
        self.input = text.to_string();
        self.input_stale = true;
    }
}
