//! # REPL Host Runtime
//!
//! This crate runs the REPL console on a development machine.
//!
//! ## Philosophy
//!
//! - **Same console, simulated devices**: The controller, decoder and
//!   interpreter are the ones the device runs; only the keyboard, display
//!   and delay are swapped out
//! - **Input is matrix events**: Scripts and typed lines become key
//!   presses and releases, decoded exactly like the hardware scan
//! - **Deterministic mode is first-class**: For tests
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Loads the console configuration
//! - Seeds the interpreter with host namespaces (`time`, `sys`)
//! - Runs the poll loop (input → step → render)
//! - Prints a text frame whenever the transcript changes

pub mod config;
pub mod delay;
pub mod input_script;
pub mod runtime;
pub mod sim_keyboard;
pub mod text_display;

pub use config::{ConfigError, ConsoleConfig};
pub use delay::{InstantDelay, StdDelay};
pub use input_script::{InputScript, InputScriptError, ScriptedInput};
pub use runtime::{HostMode, HostRuntime, HostRuntimeConfig, HostRuntimeError, SIM_PLATFORM};
pub use sim_keyboard::{SimKeyboard, EVENT_SPACING_MS};
pub use text_display::TextDisplay;
