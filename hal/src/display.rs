//! # Console Display
//!
//! This module defines the render collaborator of the REPL console.
//!
//! ## Philosophy
//!
//! The console core never draws pixels. It hands finished text blocks to a
//! display that owns the panel, the font and the bus. No VT100/ANSI
//! emulation, no cursor addressing: just "show this block in this color".
//!
//! ## Design Principles
//!
//! 1. **Two sinks**: The transcript block and the input line redraw independently
//! 2. **Infallible**: Panel failures are a driver concern, not a console concern
//! 3. **Idempotent**: Rendering the same text twice shows the same thing
//! 4. **Testable**: Can be mocked with a recording struct

/// A 24-bit display color (0xRRGGBB)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DisplayColor(u32);

impl DisplayColor {
    /// Black
    pub const BLACK: Self = Self(0x000000);

    /// Creates a color from a 0xRRGGBB value (upper bits are ignored)
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    /// Returns the 0xRRGGBB value
    pub const fn rgb(&self) -> u32 {
        self.0
    }

    /// Red component
    pub const fn r(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green component
    pub const fn g(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue component
    pub const fn b(&self) -> u8 {
        self.0 as u8
    }
}

/// Character-cell geometry of a display
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DisplayGeometry {
    /// Panel width in pixels
    pub width_px: u16,
    /// Panel height in pixels
    pub height_px: u16,
    /// Glyph cell width in pixels
    pub glyph_width: u16,
    /// Glyph cell height in pixels
    pub glyph_height: u16,
    /// Height of the transcript area above the input divider
    pub transcript_height_px: u16,
}

impl DisplayGeometry {
    /// 240x135 landscape panel, 6x12 terminal font, divider at y=110
    pub const CARDPUTER: Self = Self {
        width_px: 240,
        height_px: 135,
        glyph_width: 6,
        glyph_height: 12,
        transcript_height_px: 110,
    };

    /// Number of text columns that fit across the panel
    pub const fn cols(&self) -> usize {
        if self.glyph_width == 0 {
            return 0;
        }
        (self.width_px / self.glyph_width) as usize
    }

    /// Number of transcript lines that fit above the divider
    pub const fn transcript_rows(&self) -> usize {
        if self.glyph_height == 0 {
            return 0;
        }
        let height = if self.transcript_height_px < self.height_px {
            self.transcript_height_px
        } else {
            self.height_px
        };
        (height / self.glyph_height) as usize
    }
}

/// Render collaborator trait
///
/// Implementations own the physical panel. Both calls replace what was
/// previously shown in their region.
pub trait ConsoleDisplay {
    /// Replaces the transcript block, drawing all of it in one color
    fn render_scrollback(&mut self, text: &str, color: DisplayColor);

    /// Replaces the input line view (contents plus cursor glyph)
    fn render_input_line(&mut self, text: &str);
}

impl<D: ConsoleDisplay + ?Sized> ConsoleDisplay for Box<D> {
    fn render_scrollback(&mut self, text: &str, color: DisplayColor) {
        (**self).render_scrollback(text, color)
    }

    fn render_input_line(&mut self, text: &str) {
        (**self).render_input_line(text)
    }
}

impl<D: ConsoleDisplay + ?Sized> ConsoleDisplay for &mut D {
    fn render_scrollback(&mut self, text: &str, color: DisplayColor) {
        (**self).render_scrollback(text, color)
    }

    fn render_input_line(&mut self, text: &str) {
        (**self).render_input_line(text)
    }
}
