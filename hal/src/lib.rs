//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the hardware seams of the REPL console.
//!
//! ## Philosophy
//!
//! **The console core never touches hardware directly.**
//!
//! Display bring-up, SPI, backlight GPIO and the keyboard matrix scanner are
//! device concerns. The console sees them only through the traits here.
//!
//! ## Design Principles
//!
//! 1. **Trait-based**: Keyboard, display and delay are traits
//! 2. **Poll-based**: Nothing blocks except an explicit `Delay`
//! 3. **Deterministic translation**: Scan codes map to logical keys predictably
//! 4. **Testable**: Every trait can be faked with a few lines of code

pub mod display;
pub mod keyboard;
pub mod keyboard_translation;
pub mod timer;

pub use display::{ConsoleDisplay, DisplayColor, DisplayGeometry};
pub use keyboard::{HalKeyEvent, HalScancode, KeyboardDevice, MATRIX_COLS, MATRIX_ROWS};
pub use keyboard_translation::{
    legend_at, scancode_for_char, scancode_for_key, scancode_for_modifier, KeyLegend, KeyboardTranslator, ModifierState,
    DEFAULT_DEBOUNCE_MS,
};
pub use timer::Delay;
