//! Keyboard device abstraction
//!
//! This module provides a hardware abstraction for the scanning keyboard matrix.
//! It defines the interface that board-specific scanners must provide.
//!
//! ## Philosophy
//!
//! - **Hardware is just a source**: The matrix reports raw positions, not characters
//! - **Not a TTY**: This is not stdin, not a terminal emulator
//! - **Deterministic translation**: Positions map to legends predictably
//! - **Testable**: Can mock hardware via fake implementations
//!
//! ## Design
//!
//! The keyboard interface is minimal:
//! - Poll-based (no interrupts at HAL level)
//! - Returns raw press/release transitions
//! - Translation to logical keys happens in `keyboard_translation`

/// Number of rows in the keyboard matrix
pub const MATRIX_ROWS: u8 = 4;

/// Number of columns in the keyboard matrix
pub const MATRIX_COLS: u8 = 14;

/// Hardware scancode representation
///
/// A position in the keyboard matrix. The scanner may report positions
/// outside the matrix (line noise, a different board revision); those are
/// representable here and rejected during translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HalScancode {
    row: u8,
    col: u8,
}

impl HalScancode {
    /// Creates a scancode for a matrix position
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Returns the matrix row
    pub fn row(&self) -> u8 {
        self.row
    }

    /// Returns the matrix column
    pub fn col(&self) -> u8 {
        self.col
    }

    /// Returns true if the position lies inside the matrix
    pub fn is_valid(&self) -> bool {
        self.row < MATRIX_ROWS && self.col < MATRIX_COLS
    }

    /// Returns the flat index of this position, if it lies inside the matrix
    pub fn index(&self) -> Option<usize> {
        if self.is_valid() {
            Some(self.row as usize * MATRIX_COLS as usize + self.col as usize)
        } else {
            None
        }
    }
}

/// Hardware keyboard event
///
/// This represents a raw matrix transition before translation to a
/// logical key.
///
/// **NOTE**: This type should NOT leak outside the key decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalKeyEvent {
    /// Matrix position reported by the scanner
    pub scancode: HalScancode,

    /// Whether the key was pressed (true) or released (false)
    pub pressed: bool,

    /// Optional timestamp in nanoseconds (if the scanner provides it)
    pub timestamp_ns: Option<u64>,
}

impl HalKeyEvent {
    /// Creates a new keyboard event for a matrix position
    pub fn new(row: u8, col: u8, pressed: bool) -> Self {
        Self {
            scancode: HalScancode::new(row, col),
            pressed,
            timestamp_ns: None,
        }
    }

    /// Creates a new keyboard event with explicit scancode
    pub fn with_scancode(scancode: HalScancode, pressed: bool) -> Self {
        Self {
            scancode,
            pressed,
            timestamp_ns: None,
        }
    }

    /// Attaches a timestamp to this event
    pub fn at(mut self, timestamp_ns: u64) -> Self {
        self.timestamp_ns = Some(timestamp_ns);
        self
    }

    /// Returns true if this is a key press event
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Returns true if this is a key release event
    pub fn is_released(&self) -> bool {
        !self.pressed
    }
}

/// Keyboard device trait
///
/// Board-specific scanners provide keyboard input via this trait.
///
/// ## Implementation Notes
///
/// - **Poll-based**: Call `poll_event()` to check for new transitions
/// - **Non-blocking**: Returns `None` if nothing changed
/// - **Raw positions**: Events contain matrix positions, not characters
/// - **Stateless**: Device does not track modifier state or debouncing
pub trait KeyboardDevice {
    /// Polls for a keyboard event
    ///
    /// Returns `Some(event)` if a transition is available, or `None` if
    /// there are no pending events.
    ///
    /// This method is non-blocking and returns immediately.
    fn poll_event(&mut self) -> Option<HalKeyEvent>;
}

impl<K: KeyboardDevice + ?Sized> KeyboardDevice for Box<K> {
    fn poll_event(&mut self) -> Option<HalKeyEvent> {
        (**self).poll_event()
    }
}

impl<K: KeyboardDevice + ?Sized> KeyboardDevice for &mut K {
    fn poll_event(&mut self) -> Option<HalKeyEvent> {
        (**self).poll_event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hal_key_event_creation() {
        let event = HalKeyEvent::new(2, 2, true);
        assert_eq!(event.scancode, HalScancode::new(2, 2));
        assert!(event.is_pressed());
        assert!(!event.is_released());
        assert_eq!(event.timestamp_ns, None);
    }

    #[test]
    fn test_hal_key_event_with_timestamp() {
        let event = HalKeyEvent::new(2, 2, false).at(123456789);
        assert!(event.is_released());
        assert_eq!(event.timestamp_ns, Some(123456789));
    }

    #[test]
    fn test_scancode_bounds() {
        assert!(HalScancode::new(0, 0).is_valid());
        assert!(HalScancode::new(3, 13).is_valid());
        assert!(!HalScancode::new(4, 0).is_valid());
        assert!(!HalScancode::new(0, 14).is_valid());
    }

    #[test]
    fn test_scancode_index() {
        assert_eq!(HalScancode::new(0, 0).index(), Some(0));
        assert_eq!(HalScancode::new(1, 0).index(), Some(14));
        assert_eq!(HalScancode::new(3, 13).index(), Some(55));
        assert_eq!(HalScancode::new(9, 9).index(), None);
    }

    /// Fake keyboard device for testing
    struct FakeKeyboard {
        events: Vec<HalKeyEvent>,
        index: usize,
    }

    impl FakeKeyboard {
        fn new(events: Vec<HalKeyEvent>) -> Self {
            Self { events, index: 0 }
        }
    }

    impl KeyboardDevice for FakeKeyboard {
        fn poll_event(&mut self) -> Option<HalKeyEvent> {
            let event = self.events.get(self.index).copied();
            if event.is_some() {
                self.index += 1;
            }
            event
        }
    }

    #[test]
    fn test_fake_keyboard_device() {
        let events = vec![
            HalKeyEvent::new(2, 2, true),
            HalKeyEvent::new(2, 2, false),
            HalKeyEvent::new(3, 7, true),
        ];

        let mut keyboard = FakeKeyboard::new(events.clone());

        assert_eq!(keyboard.poll_event(), Some(events[0]));
        assert_eq!(keyboard.poll_event(), Some(events[1]));
        assert_eq!(keyboard.poll_event(), Some(events[2]));
        assert_eq!(keyboard.poll_event(), None);
        assert_eq!(keyboard.poll_event(), None);
    }

    #[test]
    fn test_keyboard_device_trait_objects() {
        let mut keyboard: Box<dyn KeyboardDevice> =
            Box::new(FakeKeyboard::new(vec![HalKeyEvent::new(2, 13, true)]));

        assert!(keyboard.poll_event().is_some());
        assert!(keyboard.poll_event().is_none());

        fn drain<K: KeyboardDevice>(mut keyboard: K) -> usize {
            let mut count = 0;
            while keyboard.poll_event().is_some() {
                count += 1;
            }
            count
        }

        let mut inner = FakeKeyboard::new(vec![
            HalKeyEvent::new(0, 13, true),
            HalKeyEvent::new(0, 13, false),
        ]);
        assert_eq!(drain(&mut inner), 2);
        assert!(inner.poll_event().is_none());
    }
}
