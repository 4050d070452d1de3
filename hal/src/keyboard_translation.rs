//! Scancode to logical key translation
//!
//! This module translates raw matrix transitions (from HAL) to logical keys
//! (from input_types).
//!
//! ## Philosophy
//!
//! - **Deterministic mapping**: Same position and modifiers always produce the same key
//! - **Explicit `None` fallback**: Unmapped positions and chords return `LogicalKey::None`
//! - **Never fails**: Garbage from the scanner degrades to `None`, it is never an error
//!
//! ## Layout
//!
//! The matrix is 4 rows by 14 columns:
//!
//! ```text
//! `  1  2  3  4  5  6  7  8  9  0  -  =  DEL
//! TAB q  w  e  r  t  y  u  i  o  p  [  ]  \
//! FN SHIFT a s d  f  g  h  j  k  l  ;  '  ENTER
//! CTRL OPT ALT z x c  v  b  n  m  ,  .  /  SPACE
//! ```
//!
//! ## Debouncing
//!
//! Key switches chatter. A press of a key that is already held is dropped,
//! and a press that lands within the debounce window after that key's last
//! release is treated as contact bounce and dropped as well.

use crate::keyboard::{HalKeyEvent, HalScancode, MATRIX_COLS, MATRIX_ROWS};
use input_types::{LogicalKey, Modifiers};
use log::{debug, trace};

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 10;

const KEY_COUNT: usize = MATRIX_ROWS as usize * MATRIX_COLS as usize;

/// What is printed on a key cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLegend {
    /// A printable key with its unshifted and shifted characters
    Printable { plain: char, shifted: char },
    /// One of the named console keys (Enter, DEL, Tab, Space)
    Named(LogicalKey),
    /// A modifier key
    Modifier(Modifiers),
}

const fn sym(plain: char, shifted: char) -> KeyLegend {
    KeyLegend::Printable { plain, shifted }
}

const fn letter(plain: char) -> KeyLegend {
    KeyLegend::Printable {
        plain,
        shifted: plain.to_ascii_uppercase(),
    }
}

const fn named(key: LogicalKey) -> KeyLegend {
    KeyLegend::Named(key)
}

const fn modifier(modifiers: Modifiers) -> KeyLegend {
    KeyLegend::Modifier(modifiers)
}

const KEYMAP: [[KeyLegend; MATRIX_COLS as usize]; MATRIX_ROWS as usize] = [
    [
        sym('`', '~'),
        sym('1', '!'),
        sym('2', '@'),
        sym('3', '#'),
        sym('4', '$'),
        sym('5', '%'),
        sym('6', '^'),
        sym('7', '&'),
        sym('8', '*'),
        sym('9', '('),
        sym('0', ')'),
        sym('-', '_'),
        sym('=', '+'),
        named(LogicalKey::Backspace),
    ],
    [
        named(LogicalKey::Tab),
        letter('q'),
        letter('w'),
        letter('e'),
        letter('r'),
        letter('t'),
        letter('y'),
        letter('u'),
        letter('i'),
        letter('o'),
        letter('p'),
        sym('[', '{'),
        sym(']', '}'),
        sym('\\', '|'),
    ],
    [
        modifier(Modifiers::FN),
        modifier(Modifiers::SHIFT),
        letter('a'),
        letter('s'),
        letter('d'),
        letter('f'),
        letter('g'),
        letter('h'),
        letter('j'),
        letter('k'),
        letter('l'),
        sym(';', ':'),
        sym('\'', '"'),
        named(LogicalKey::Enter),
    ],
    [
        modifier(Modifiers::CTRL),
        modifier(Modifiers::OPT),
        modifier(Modifiers::ALT),
        letter('z'),
        letter('x'),
        letter('c'),
        letter('v'),
        letter('b'),
        letter('n'),
        letter('m'),
        sym(',', '<'),
        sym('.', '>'),
        sym('/', '?'),
        named(LogicalKey::Space),
    ],
];

/// Returns the legend printed at a matrix position
///
/// Returns `None` for positions outside the matrix.
pub fn legend_at(scancode: HalScancode) -> Option<KeyLegend> {
    if !scancode.is_valid() {
        return None;
    }
    Some(KEYMAP[scancode.row() as usize][scancode.col() as usize])
}

fn positions() -> impl Iterator<Item = (HalScancode, KeyLegend)> {
    (0..MATRIX_ROWS).flat_map(|row| {
        (0..MATRIX_COLS).map(move |col| {
            let scancode = HalScancode::new(row, col);
            (scancode, KEYMAP[row as usize][col as usize])
        })
    })
}

/// Finds the key that types a character
///
/// Returns the matrix position and whether Shift must be held.
/// A space maps to the SPACE key.
pub fn scancode_for_char(c: char) -> Option<(HalScancode, bool)> {
    if c == ' ' {
        return scancode_for_key(LogicalKey::Space).map(|(sc, _)| (sc, false));
    }
    positions().find_map(|(scancode, legend)| match legend {
        KeyLegend::Printable { plain, .. } if plain == c => Some((scancode, false)),
        KeyLegend::Printable { shifted, .. } if shifted == c => Some((scancode, true)),
        _ => None,
    })
}

/// Finds the key that produces a logical key
///
/// Returns the matrix position and whether Shift must be held.
pub fn scancode_for_key(key: LogicalKey) -> Option<(HalScancode, bool)> {
    match key {
        LogicalKey::Char(c) => scancode_for_char(c),
        LogicalKey::None => None,
        named_key => positions().find_map(|(scancode, legend)| {
            (legend == KeyLegend::Named(named_key)).then_some((scancode, false))
        }),
    }
}

/// Finds the matrix position of a single modifier key
pub fn scancode_for_modifier(modifier: Modifiers) -> Option<HalScancode> {
    positions().find_map(|(scancode, legend)| {
        (legend == KeyLegend::Modifier(modifier)).then_some(scancode)
    })
}

/// Modifier key tracking state
///
/// This tracks which modifier keys are currently held.
#[derive(Debug, Clone, Default)]
pub struct ModifierState {
    held: Modifiers,
}

impl ModifierState {
    /// Creates a new modifier state (all released)
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates modifier state for a modifier key transition
    pub fn update(&mut self, modifier: Modifiers, pressed: bool) {
        self.held = if pressed {
            self.held.with(modifier)
        } else {
            self.held.without(modifier)
        };
    }

    /// Returns the current Modifiers flags
    pub fn to_modifiers(&self) -> Modifiers {
        self.held
    }
}

/// Keyboard translator
///
/// Maintains modifier and debounce state and translates raw matrix
/// transitions to logical keys. Every call yields exactly one token.
pub struct KeyboardTranslator {
    modifiers: ModifierState,
    held: [bool; KEY_COUNT],
    last_release_ns: [Option<u64>; KEY_COUNT],
    debounce_ns: u64,
}

impl KeyboardTranslator {
    /// Creates a new keyboard translator with the default debounce window
    pub fn new() -> Self {
        Self::with_debounce_ms(DEFAULT_DEBOUNCE_MS)
    }

    /// Creates a keyboard translator with an explicit debounce window
    pub fn with_debounce_ms(debounce_ms: u64) -> Self {
        Self {
            modifiers: ModifierState::new(),
            held: [false; KEY_COUNT],
            last_release_ns: [None; KEY_COUNT],
            debounce_ns: debounce_ms.saturating_mul(1_000_000),
        }
    }

    /// Returns the modifiers currently held
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers.to_modifiers()
    }

    /// Translates a HAL keyboard event to a logical key
    ///
    /// Returns `LogicalKey::None` for releases, modifier keys, bounces,
    /// layer chords and positions outside the matrix.
    pub fn translate(&mut self, event: HalKeyEvent) -> LogicalKey {
        let Some(index) = event.scancode.index() else {
            debug!(
                "dropping scancode outside the key matrix: row {} col {}",
                event.scancode.row(),
                event.scancode.col()
            );
            return LogicalKey::None;
        };
        let legend = KEYMAP[index / MATRIX_COLS as usize][index % MATRIX_COLS as usize];

        if event.is_released() {
            self.held[index] = false;
            self.last_release_ns[index] = event.timestamp_ns;
            if let KeyLegend::Modifier(modifier) = legend {
                self.modifiers.update(modifier, false);
            }
            return LogicalKey::None;
        }

        if let KeyLegend::Modifier(modifier) = legend {
            self.held[index] = true;
            self.modifiers.update(modifier, true);
            return LogicalKey::None;
        }

        if self.held[index] {
            trace!("ignoring press of held key {:?}", legend);
            return LogicalKey::None;
        }
        self.held[index] = true;

        if self.is_bounce(index, event.timestamp_ns) {
            debug!("ignoring bounced press of {:?}", legend);
            return LogicalKey::None;
        }

        let mods = self.modifiers.to_modifiers();
        if mods.is_layer() {
            debug!("ignoring {:?} chord with {}", legend, mods);
            return LogicalKey::None;
        }

        match legend {
            KeyLegend::Named(key) => key,
            KeyLegend::Printable { plain, shifted } => {
                LogicalKey::Char(if mods.is_shift() { shifted } else { plain })
            }
            KeyLegend::Modifier(_) => LogicalKey::None,
        }
    }

    fn is_bounce(&self, index: usize, pressed_at: Option<u64>) -> bool {
        match (pressed_at, self.last_release_ns[index]) {
            (Some(pressed_at), Some(released_at)) => {
                pressed_at.saturating_sub(released_at) < self.debounce_ns
            }
            _ => false,
        }
    }

    /// Resets the translator state (all keys and modifiers released)
    pub fn reset(&mut self) {
        self.modifiers = ModifierState::new();
        self.held = [false; KEY_COUNT];
        self.last_release_ns = [None; KEY_COUNT];
    }
}

impl Default for KeyboardTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    fn press(row: u8, col: u8) -> HalKeyEvent {
        HalKeyEvent::new(row, col, true)
    }

    fn release(row: u8, col: u8) -> HalKeyEvent {
        HalKeyEvent::new(row, col, false)
    }

    #[test]
    fn test_legend_at_letters() {
        assert_eq!(
            legend_at(HalScancode::new(2, 2)),
            Some(KeyLegend::Printable {
                plain: 'a',
                shifted: 'A'
            })
        );
        assert_eq!(
            legend_at(HalScancode::new(3, 3)),
            Some(KeyLegend::Printable {
                plain: 'z',
                shifted: 'Z'
            })
        );
    }

    #[test]
    fn test_legend_at_named_keys() {
        assert_eq!(
            legend_at(HalScancode::new(0, 13)),
            Some(KeyLegend::Named(LogicalKey::Backspace))
        );
        assert_eq!(
            legend_at(HalScancode::new(1, 0)),
            Some(KeyLegend::Named(LogicalKey::Tab))
        );
        assert_eq!(
            legend_at(HalScancode::new(2, 13)),
            Some(KeyLegend::Named(LogicalKey::Enter))
        );
        assert_eq!(
            legend_at(HalScancode::new(3, 13)),
            Some(KeyLegend::Named(LogicalKey::Space))
        );
    }

    #[test]
    fn test_legend_at_out_of_range() {
        assert_eq!(legend_at(HalScancode::new(4, 0)), None);
        assert_eq!(legend_at(HalScancode::new(0, 200)), None);
    }

    #[test]
    fn test_scancode_for_char() {
        assert_eq!(scancode_for_char('a'), Some((HalScancode::new(2, 2), false)));
        assert_eq!(scancode_for_char('A'), Some((HalScancode::new(2, 2), true)));
        assert_eq!(scancode_for_char('('), Some((HalScancode::new(0, 9), true)));
        assert_eq!(scancode_for_char('+'), Some((HalScancode::new(0, 12), true)));
        assert_eq!(scancode_for_char(' '), Some((HalScancode::new(3, 13), false)));
        assert_eq!(scancode_for_char('é'), None);
    }

    #[test]
    fn test_scancode_for_key_and_modifier() {
        assert_eq!(
            scancode_for_key(LogicalKey::Enter),
            Some((HalScancode::new(2, 13), false))
        );
        assert_eq!(scancode_for_key(LogicalKey::None), None);
        assert_eq!(
            scancode_for_modifier(Modifiers::SHIFT),
            Some(HalScancode::new(2, 1))
        );
        assert_eq!(
            scancode_for_modifier(Modifiers::CTRL),
            Some(HalScancode::new(3, 0))
        );
    }

    #[test]
    fn test_every_printable_char_round_trips() {
        let mut translator = KeyboardTranslator::with_debounce_ms(0);
        for c in "abcxyz0123456789-=[];',./\\`".chars() {
            let (scancode, shift) = scancode_for_char(c).unwrap();
            assert!(!shift);
            let key = translator.translate(HalKeyEvent::with_scancode(scancode, true));
            translator.translate(HalKeyEvent::with_scancode(scancode, false));
            assert_eq!(key, LogicalKey::Char(c));
        }
    }

    #[test]
    fn test_modifier_state_shift() {
        let mut state = ModifierState::new();
        assert!(state.to_modifiers().is_empty());

        state.update(Modifiers::SHIFT, true);
        assert!(state.to_modifiers().is_shift());

        state.update(Modifiers::SHIFT, false);
        assert!(state.to_modifiers().is_empty());
    }

    #[test]
    fn test_translator_basic() {
        let mut translator = KeyboardTranslator::new();

        assert_eq!(translator.translate(press(2, 2)), LogicalKey::Char('a'));
        assert_eq!(translator.translate(release(2, 2)), LogicalKey::None);
    }

    #[test]
    fn test_translator_named_keys() {
        let mut translator = KeyboardTranslator::new();

        assert_eq!(translator.translate(press(2, 13)), LogicalKey::Enter);
        assert_eq!(translator.translate(press(0, 13)), LogicalKey::Backspace);
        assert_eq!(translator.translate(press(1, 0)), LogicalKey::Tab);
        assert_eq!(translator.translate(press(3, 13)), LogicalKey::Space);
    }

    #[test]
    fn test_translator_with_shift() {
        let mut translator = KeyboardTranslator::new();

        assert_eq!(translator.translate(press(2, 1)), LogicalKey::None);
        assert_eq!(translator.translate(press(2, 2)), LogicalKey::Char('A'));
        assert_eq!(translator.translate(press(0, 9)), LogicalKey::Char('('));

        translator.translate(release(2, 1));
        translator.translate(release(2, 2));
        assert!(translator.modifiers().is_empty());
    }

    #[test]
    fn test_translator_layer_chords_are_ignored() {
        let mut translator = KeyboardTranslator::new();

        translator.translate(press(3, 0)); // Ctrl
        assert_eq!(translator.translate(press(3, 5)), LogicalKey::None);
        translator.translate(release(3, 5));
        translator.translate(release(3, 0));

        translator.translate(press(2, 0)); // Fn
        assert_eq!(translator.translate(press(2, 13)), LogicalKey::None);
        translator.translate(release(2, 13));
        translator.translate(release(2, 0));

        assert_eq!(translator.translate(press(3, 5)), LogicalKey::Char('c'));
    }

    #[test]
    fn test_translator_unknown_positions() {
        let mut translator = KeyboardTranslator::new();

        assert_eq!(translator.translate(press(7, 1)), LogicalKey::None);
        assert_eq!(translator.translate(release(0, 99)), LogicalKey::None);
    }

    #[test]
    fn test_translator_held_key_does_not_repeat() {
        let mut translator = KeyboardTranslator::new();

        assert_eq!(translator.translate(press(2, 2)), LogicalKey::Char('a'));
        assert_eq!(translator.translate(press(2, 2)), LogicalKey::None);
        translator.translate(release(2, 2));
        assert_eq!(translator.translate(press(2, 2)), LogicalKey::Char('a'));
    }

    #[test]
    fn test_translator_debounce_window() {
        let mut translator = KeyboardTranslator::with_debounce_ms(10);

        assert_eq!(
            translator.translate(press(2, 2).at(0)),
            LogicalKey::Char('a')
        );
        translator.translate(release(2, 2).at(20 * MS));
        // Bounce: re-press 3ms after release
        assert_eq!(translator.translate(press(2, 2).at(23 * MS)), LogicalKey::None);
        translator.translate(release(2, 2).at(24 * MS));
        // Genuine second press well after release
        assert_eq!(
            translator.translate(press(2, 2).at(60 * MS)),
            LogicalKey::Char('a')
        );
    }

    #[test]
    fn test_translator_debounce_is_per_key() {
        let mut translator = KeyboardTranslator::with_debounce_ms(10);

        translator.translate(press(2, 2).at(0));
        translator.translate(release(2, 2).at(5 * MS));
        assert_eq!(
            translator.translate(press(2, 3).at(6 * MS)),
            LogicalKey::Char('s')
        );
    }

    #[test]
    fn test_translator_reset() {
        let mut translator = KeyboardTranslator::new();

        translator.translate(press(2, 1));
        translator.translate(press(2, 2));
        translator.reset();

        assert!(translator.modifiers().is_empty());
        assert_eq!(translator.translate(press(2, 2)), LogicalKey::Char('a'));
    }
}
