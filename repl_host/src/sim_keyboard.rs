//! Simulated key matrix
//!
//! Queues raw press/release events the way the matrix scanner would report
//! them. Every event is stamped from a simulated clock that advances a
//! fixed step per event, so scripted repeats never look like contact
//! bounce.

use crate::input_script::ScriptedInput;
use hal::{scancode_for_modifier, HalKeyEvent, HalScancode, KeyboardDevice};
use input_types::{LogicalKey, Modifiers};
use log::{trace, warn};
use std::collections::VecDeque;

/// Simulated time between consecutive matrix events
pub const EVENT_SPACING_MS: u64 = 50;

/// Modifiers in the order they are pressed for a chord
const CHORD_ORDER: [Modifiers; 5] = [
    Modifiers::FN,
    Modifiers::CTRL,
    Modifiers::OPT,
    Modifiers::ALT,
    Modifiers::SHIFT,
];

/// Keyboard fed from scripts or typed lines
#[derive(Debug, Default)]
pub struct SimKeyboard {
    events: VecDeque<HalKeyEvent>,
    clock_ns: u64,
}

impl SimKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, scancode: HalScancode, pressed: bool) {
        self.clock_ns = self
            .clock_ns
            .saturating_add(EVENT_SPACING_MS.saturating_mul(1_000_000));
        self.events
            .push_back(HalKeyEvent::with_scancode(scancode, pressed).at(self.clock_ns));
    }

    /// Queues a tap of `scancode` with `modifiers` held around it
    pub fn press_chord(&mut self, scancode: HalScancode, modifiers: Modifiers) {
        let held: Vec<HalScancode> = CHORD_ORDER
            .iter()
            .filter(|m| modifiers.contains(**m))
            .filter_map(|m| scancode_for_modifier(*m))
            .collect();

        for modifier in &held {
            self.push(*modifier, true);
        }
        self.push(scancode, true);
        self.push(scancode, false);
        for modifier in held.iter().rev() {
            self.push(*modifier, false);
        }
    }

    /// Queues one scripted action
    pub fn apply(&mut self, input: ScriptedInput) {
        match input {
            ScriptedInput::Key(scancode, modifiers) => self.press_chord(scancode, modifiers),
            ScriptedInput::Wait(millis) => self.advance(millis),
        }
    }

    /// Queues the keystrokes for `line` followed by Enter
    ///
    /// Characters with no key on the matrix are skipped. Returns how many
    /// were skipped.
    pub fn type_line(&mut self, line: &str) -> usize {
        let mut skipped = 0;
        for c in line.chars() {
            match ScriptedInput::for_char(c) {
                Some(input) => self.apply(input),
                None => {
                    warn!("no key for {:?}, skipping", c);
                    skipped += 1;
                }
            }
        }
        if let Some(enter) = ScriptedInput::for_key(LogicalKey::Enter) {
            self.apply(enter);
        }
        skipped
    }

    /// Advances the simulated clock
    pub fn advance(&mut self, millis: u64) {
        trace!("sim keyboard clock +{}ms", millis);
        self.clock_ns = self.clock_ns.saturating_add(millis.saturating_mul(1_000_000));
    }

    /// Current simulated time
    pub fn now_ns(&self) -> u64 {
        self.clock_ns
    }

    /// Number of queued matrix events
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_idle(&self) -> bool {
        self.events.is_empty()
    }
}

impl KeyboardDevice for SimKeyboard {
    fn poll_event(&mut self) -> Option<HalKeyEvent> {
        self.events.pop_front()
    }
}
