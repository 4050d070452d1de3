//! Key decoder
//!
//! Turns raw matrix events from a `KeyboardDevice` into logical keys.

use hal::{KeyboardDevice, KeyboardTranslator};
use input_types::LogicalKey;

/// Polls a keyboard device and decodes its events
pub struct KeyDecoder<K> {
    device: K,
    translator: KeyboardTranslator,
}

impl<K: KeyboardDevice> KeyDecoder<K> {
    /// Creates a decoder with the default debounce window
    pub fn new(device: K) -> Self {
        Self::with_translator(device, KeyboardTranslator::new())
    }

    pub fn with_translator(device: K, translator: KeyboardTranslator) -> Self {
        Self { device, translator }
    }

    /// Reads at most one pending event
    ///
    /// Never blocks. Returns `LogicalKey::None` when nothing is pending or
    /// when the pending event carries no logical meaning (a release, a
    /// modifier, a bounce or an unmapped key).
    pub fn poll(&mut self) -> LogicalKey {
        match self.device.poll_event() {
            Some(event) => self.translator.translate(event),
            None => LogicalKey::None,
        }
    }

    /// Lazily decodes every pending event, skipping meaningless ones
    ///
    /// The iterator ends as soon as the device has nothing pending.
    pub fn keys(&mut self) -> Keys<'_, K> {
        Keys { decoder: self }
    }

    pub fn translator(&self) -> &KeyboardTranslator {
        &self.translator
    }

    pub fn device(&self) -> &K {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut K {
        &mut self.device
    }

    pub fn into_device(self) -> K {
        self.device
    }
}

/// Iterator returned by [`KeyDecoder::keys`]
pub struct Keys<'a, K> {
    decoder: &'a mut KeyDecoder<K>,
}

impl<K: KeyboardDevice> Iterator for Keys<'_, K> {
    type Item = LogicalKey;

    fn next(&mut self) -> Option<LogicalKey> {
        loop {
            let event = self.decoder.device.poll_event()?;
            let key = self.decoder.translator.translate(event);
            if key.is_some() {
                return Some(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal::{scancode_for_char, scancode_for_modifier, HalKeyEvent};
    use input_types::Modifiers;
    use std::collections::VecDeque;

    struct QueueKeyboard {
        events: VecDeque<HalKeyEvent>,
    }

    impl KeyboardDevice for QueueKeyboard {
        fn poll_event(&mut self) -> Option<HalKeyEvent> {
            self.events.pop_front()
        }
    }

    fn tap(c: char) -> Vec<HalKeyEvent> {
        let (scancode, _) = scancode_for_char(c).unwrap();
        vec![
            HalKeyEvent::with_scancode(scancode, true),
            HalKeyEvent::with_scancode(scancode, false),
        ]
    }

    fn decoder(events: Vec<HalKeyEvent>) -> KeyDecoder<QueueKeyboard> {
        KeyDecoder::new(QueueKeyboard {
            events: events.into(),
        })
    }

    #[test]
    fn test_poll_on_idle_device_is_none() {
        let mut decoder = decoder(Vec::new());
        assert_eq!(decoder.poll(), LogicalKey::None);
        assert_eq!(decoder.poll(), LogicalKey::None);
    }

    #[test]
    fn test_poll_yields_one_token_per_event() {
        let mut decoder = decoder(tap('a'));
        assert_eq!(decoder.poll(), LogicalKey::Char('a'));
        assert_eq!(decoder.poll(), LogicalKey::None);
        assert_eq!(decoder.poll(), LogicalKey::None);
    }

    #[test]
    fn test_keys_skips_releases_and_modifiers() {
        let shift = scancode_for_modifier(Modifiers::SHIFT).unwrap();
        let mut events = tap('1');
        events.push(HalKeyEvent::with_scancode(shift, true));
        events.extend(tap('1'));
        events.push(HalKeyEvent::with_scancode(shift, false));
        events.extend(tap(' '));

        let mut decoder = decoder(events);
        let keys: Vec<LogicalKey> = decoder.keys().collect();
        assert_eq!(
            keys,
            vec![LogicalKey::Char('1'), LogicalKey::Char('!'), LogicalKey::Space]
        );
        assert_eq!(decoder.poll(), LogicalKey::None);
    }

    #[test]
    fn test_out_of_range_scancode_is_none() {
        let mut decoder = decoder(vec![HalKeyEvent::new(9, 40, true)]);
        assert_eq!(decoder.poll(), LogicalKey::None);
    }
}
