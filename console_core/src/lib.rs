//! # Console Core
//!
//! This crate provides the text state of the REPL console: the transcript
//! (scrollback) and the line being typed.
//!
//! ## Philosophy
//!
//! This is NOT a terminal emulator. No ANSI escape codes, no VT100, no TTY model.
//! It is deterministic text bookkeeping: same pushes → same block.
//!
//! ## Design Principles
//!
//! 1. **Total operations**: Nothing here can fail
//! 2. **Bounded**: The transcript never holds more than `max_lines` lines
//! 3. **Hard wrap**: Overlong lines are cut at the column width
//! 4. **One color per redraw**: The whole block takes the style of the last push

pub mod input_line;
pub mod scrollback;
pub mod styling;

pub use input_line::InputLine;
pub use scrollback::{wrap_lines, ScrollbackBuffer};
pub use styling::{
    Banner, Palette, PaletteColor, Style, StyledText, CURSOR_GLYPH, ECHO_PREFIX, ERROR_PREFIX,
    PROMPT,
};

use hal::DisplayGeometry;

/// Default transcript width in columns, as many glyphs as fit across the panel
pub const DEFAULT_COLS: usize = DisplayGeometry::CARDPUTER.cols();

/// Default transcript height in lines, as many rows as fit above the divider
pub const DEFAULT_MAX_LINES: usize = DisplayGeometry::CARDPUTER.transcript_rows();
