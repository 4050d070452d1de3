//! # Host Runtime
//!
//! The main event loop that ties everything together.

use crate::config::ConsoleConfig;
use crate::delay::{InstantDelay, StdDelay};
use crate::input_script::{InputScript, InputScriptError, ScriptedInput};
use crate::sim_keyboard::SimKeyboard;
use crate::text_display::TextDisplay;
use hal::Delay;
use input_types::LogicalKey;
use log::{debug, info};
use repl_console::{ConsoleController, KeyDecoder};
use repl_eval::builtins::{sys_namespace, time_namespace};
use repl_eval::Interpreter;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use thiserror::Error;

/// Platform reported by `sys.platform`
pub const SIM_PLATFORM: &str = "cardputer-sim";

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Script error: {0}")]
    ScriptError(#[from] InputScriptError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Host mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    /// Simulation mode (deterministic, scripted input)
    Sim,
    /// Each line read from the input is typed on the simulated keyboard
    Lines,
}

/// Host runtime configuration
#[derive(Debug, Clone)]
pub struct HostRuntimeConfig {
    /// Host mode
    pub mode: HostMode,
    /// Optional input script (for sim mode)
    pub script: Option<String>,
    /// Maximum steps to run (0 = unlimited)
    pub max_steps: usize,
    /// Sleep for real between polls and on script waits
    pub realtime: bool,
    /// Console layout and appearance
    pub console: ConsoleConfig,
}

impl Default for HostRuntimeConfig {
    fn default() -> Self {
        Self {
            mode: HostMode::Sim,
            script: None,
            max_steps: 0,
            realtime: false,
            console: ConsoleConfig::default(),
        }
    }
}

type HostConsole = ConsoleController<SimKeyboard, TextDisplay, Interpreter>;

/// Host runtime
pub struct HostRuntime {
    /// Configuration
    config: HostRuntimeConfig,
    /// The console under simulation
    console: HostConsole,
    /// Input script (if in sim mode)
    script: Option<InputScript>,
    /// Pause between polls
    delay: Box<dyn Delay>,
    /// Where frames are written
    out: Box<dyn Write>,
    /// Step counter
    steps: usize,
}

impl HostRuntime {
    /// Creates a new host runtime writing frames to stdout
    pub fn new(config: HostRuntimeConfig) -> Result<Self, HostRuntimeError> {
        Self::with_output(config, Box::new(io::stdout()))
    }

    /// Creates a new host runtime writing frames to `out`
    pub fn with_output(
        config: HostRuntimeConfig,
        out: Box<dyn Write>,
    ) -> Result<Self, HostRuntimeError> {
        // Parse script if provided
        let script = match &config.script {
            Some(text) => Some(InputScript::from_text(text)?),
            None => None,
        };

        let mut interpreter = Interpreter::new();
        let env = interpreter.env_mut();
        env.install(time_namespace(Instant::now()));
        env.install(sys_namespace(
            SIM_PLATFORM,
            concat!("repl_host ", env!("CARGO_PKG_VERSION")),
        ));

        let decoder = KeyDecoder::with_translator(SimKeyboard::new(), config.console.translator());
        let console = ConsoleController::with_options(
            decoder,
            TextDisplay::new(),
            interpreter,
            config.console.controller_options(),
        );

        let delay: Box<dyn Delay> = if config.realtime {
            Box::new(StdDelay)
        } else {
            Box::new(InstantDelay::new())
        };

        info!("host runtime ready in {:?} mode", config.mode);

        let mut runtime = Self {
            config,
            console,
            script,
            delay,
            out,
            steps: 0,
        };
        runtime.flush_frame()?;
        Ok(runtime)
    }

    /// Runs the host event loop
    ///
    /// Returns when:
    /// - Max steps reached (if configured)
    /// - Script exhausted and every queued key consumed (sim mode)
    /// - Standard input closed (lines mode)
    pub fn run(&mut self) -> Result<(), HostRuntimeError> {
        match self.config.mode {
            HostMode::Sim => self.run_script(),
            HostMode::Lines => {
                let stdin = io::stdin();
                self.run_lines(stdin.lock())
            }
        }
    }

    /// Runs until the script and the keyboard queue are exhausted
    pub fn run_script(&mut self) -> Result<(), HostRuntimeError> {
        while !self.step_limit_reached() {
            let script_done = self.script.as_ref().map_or(true, |s| !s.has_more());
            if script_done && self.keyboard_idle() {
                break;
            }
            self.step()?;
        }
        self.flush_pending_frame()
    }

    /// Types every line of `reader` and runs until each is consumed
    pub fn run_lines<R: BufRead>(&mut self, reader: R) -> Result<(), HostRuntimeError> {
        for line in reader.lines() {
            let line = line?;
            let skipped = self.console.decoder_mut().device_mut().type_line(&line);
            if skipped > 0 {
                debug!("{} character(s) of {:?} have no key", skipped, line);
            }
            while !self.keyboard_idle() {
                if self.step_limit_reached() {
                    return self.flush_pending_frame();
                }
                self.step()?;
            }
        }
        self.flush_pending_frame()
    }

    /// Executes one step of the event loop
    pub fn step(&mut self) -> Result<LogicalKey, HostRuntimeError> {
        // 1. Input pump
        if self.keyboard_idle() {
            self.pump_sim_input();
        }

        // 2. Console poll
        let key = self.console.step();
        self.steps += 1;

        // 3. Render step (if the transcript changed)
        self.flush_frame()?;

        self.delay.delay_ms(self.console.poll_interval_ms());
        Ok(key)
    }

    /// Feeds the next scripted action to the keyboard
    fn pump_sim_input(&mut self) {
        let Some(input) = self.script.as_mut().and_then(InputScript::next_input) else {
            return;
        };
        if let ScriptedInput::Wait(millis) = input {
            self.delay.delay_ms(millis);
        }
        self.console.decoder_mut().device_mut().apply(input);
    }

    fn keyboard_idle(&self) -> bool {
        self.console.decoder().device().is_idle()
    }

    fn step_limit_reached(&self) -> bool {
        self.config.max_steps > 0 && self.steps >= self.config.max_steps
    }

    fn flush_frame(&mut self) -> Result<(), HostRuntimeError> {
        if let Some(frame) = self.console.display_mut().take_frame() {
            writeln!(self.out, "{}\n", frame)?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn flush_pending_frame(&mut self) -> Result<(), HostRuntimeError> {
        if let Some(frame) = self.console.display_mut().take_pending_frame() {
            writeln!(self.out, "{}\n", frame)?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Returns the console (for testing)
    pub fn console(&self) -> &HostConsole {
        &self.console
    }

    /// Returns the console mutably (for testing)
    pub fn console_mut(&mut self) -> &mut HostConsole {
        &mut self.console
    }

    /// Returns the display (for testing)
    pub fn display(&self) -> &TextDisplay {
        self.console.display()
    }

    /// Returns the step count
    pub fn step_count(&self) -> usize {
        self.steps
    }
}
