//! # REPL Console
//!
//! The interactive console: keyboard in, transcript and input line out.
//!
//! ```text
//! KeyboardDevice -> KeyDecoder -> ConsoleController -> ConsoleDisplay
//!                                       |
//!                                 EvaluatorBridge -> Evaluator
//! ```
//!
//! The controller is single-threaded and poll-driven. It owns the decoder,
//! the transcript, the input line and the bridge; nothing is global.

pub mod bridge;
pub mod controller;
pub mod decoder;

pub use bridge::{EvaluationOutcome, EvaluatorBridge};
pub use controller::{ConsoleController, ControllerOptions, DEFAULT_POLL_INTERVAL_MS};
pub use decoder::{KeyDecoder, Keys};
