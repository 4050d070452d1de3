//! Console controller
//!
//! Owns all console state and maps each logical key to an editing action
//! or a submission. The transcript is redrawn only when it changed.

use crate::bridge::{EvaluationOutcome, EvaluatorBridge};
use crate::decoder::KeyDecoder;
use console_core::{
    Banner, InputLine, Palette, ScrollbackBuffer, Style, StyledText, DEFAULT_COLS,
    DEFAULT_MAX_LINES,
};
use hal::{ConsoleDisplay, Delay, KeyboardDevice};
use input_types::LogicalKey;
use log::{info, trace, warn};
use repl_eval::Evaluator;

/// Default pause between polls
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5;

/// Layout and appearance of a console
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    pub cols: usize,
    pub max_lines: usize,
    pub poll_interval_ms: u64,
    pub max_input_len: Option<usize>,
    pub banner: Banner,
    pub palette: Palette,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            max_lines: DEFAULT_MAX_LINES,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_input_len: None,
            banner: Banner::default(),
            palette: Palette::default(),
        }
    }
}

/// The REPL console
pub struct ConsoleController<K, D, E> {
    decoder: KeyDecoder<K>,
    display: D,
    bridge: EvaluatorBridge<E>,
    scrollback: ScrollbackBuffer,
    input: InputLine,
    palette: Palette,
    poll_interval_ms: u64,
}

impl<K, D, E> ConsoleController<K, D, E>
where
    K: KeyboardDevice,
    D: ConsoleDisplay,
    E: Evaluator,
{
    /// Creates a console with default options
    pub fn new(decoder: KeyDecoder<K>, display: D, evaluator: E) -> Self {
        Self::with_options(decoder, display, evaluator, ControllerOptions::default())
    }

    /// Creates a console, shows the banner and draws both views
    pub fn with_options(
        decoder: KeyDecoder<K>,
        display: D,
        evaluator: E,
        options: ControllerOptions,
    ) -> Self {
        let input = match options.max_input_len {
            Some(max) => InputLine::with_max_len(max),
            None => InputLine::new(),
        };

        let mut controller = Self {
            decoder,
            display,
            bridge: EvaluatorBridge::new(evaluator),
            scrollback: ScrollbackBuffer::new(options.cols, options.max_lines),
            input,
            palette: options.palette,
            poll_interval_ms: options.poll_interval_ms,
        };

        for line in options.banner.lines() {
            controller.push(StyledText::dim(line.as_str()));
        }
        controller.draw_scrollback();
        controller.draw_input();
        info!(
            "console ready ({}x{})",
            controller.scrollback.cols(),
            controller.scrollback.max_lines()
        );
        controller
    }

    /// Polls the keyboard once and applies the decoded key
    pub fn step(&mut self) -> LogicalKey {
        let key = self.decoder.poll();
        self.handle_key(key);
        key
    }

    /// Applies one logical key
    ///
    /// Returns false for `LogicalKey::None`, which changes nothing.
    pub fn handle_key(&mut self, key: LogicalKey) -> bool {
        match key {
            LogicalKey::None => return false,
            LogicalKey::Enter => self.submit(),
            LogicalKey::Backspace => {
                self.input.backspace();
            }
            LogicalKey::Tab => self.input.append("  "),
            LogicalKey::Space => self.input.append(" "),
            LogicalKey::Char(c) => {
                let mut buf = [0u8; 4];
                self.input.append(c.encode_utf8(&mut buf));
            }
        }
        trace!("key {} -> input {:?}", key, self.input.as_str());
        self.draw_input();
        true
    }

    /// Polls forever, pausing between polls
    pub fn run<T: Delay>(&mut self, delay: &mut T) -> ! {
        loop {
            self.step();
            delay.delay_ms(self.poll_interval_ms);
        }
    }

    fn submit(&mut self) {
        let line = self.input.clear();
        info!("submit {:?}", line);

        self.push(StyledText::echo(&line));
        let outcome = self.bridge.submit(&line);
        for printed in self.bridge.take_output() {
            self.push(StyledText::normal(printed));
        }
        match outcome {
            EvaluationOutcome::Value(text) => self.push(StyledText::normal(text)),
            EvaluationOutcome::NoValue => {}
            EvaluationOutcome::Error(message) => {
                warn!("evaluation failed: {}", message);
                self.push(StyledText::alert(&message));
            }
        }
        self.draw_scrollback();
    }

    fn push(&mut self, text: StyledText) {
        self.scrollback.push(&text.text, text.style);
    }

    fn draw_scrollback(&mut self) {
        let color = self.palette.color(self.scrollback.style());
        self.display
            .render_scrollback(&self.scrollback.render(), color);
    }

    fn draw_input(&mut self) {
        self.display.render_input_line(&self.input.render());
    }

    pub fn scrollback(&self) -> &ScrollbackBuffer {
        &self.scrollback
    }

    pub fn input(&self) -> &InputLine {
        &self.input
    }

    /// Current transcript style
    pub fn style(&self) -> Style {
        self.scrollback.style()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn decoder(&self) -> &KeyDecoder<K> {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut KeyDecoder<K> {
        &mut self.decoder
    }

    pub fn evaluator_mut(&mut self) -> &mut E {
        self.bridge.evaluator_mut()
    }
}
