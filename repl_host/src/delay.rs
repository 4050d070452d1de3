//! Delay providers for the host loop

use hal::Delay;
use std::thread;
use std::time::Duration;

/// Sleeps the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u64) {
        if ms > 0 {
            thread::sleep(Duration::from_millis(ms));
        }
    }
}

/// Returns immediately, only accounting the requested time
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantDelay {
    elapsed_ms: u64,
}

impl InstantDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total time requested so far
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}

impl Delay for InstantDelay {
    fn delay_ms(&mut self, ms: u64) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_instant_delay_accumulates() {
        let mut delay = InstantDelay::new();
        delay.delay_ms(5);
        delay.delay_ms(100);
        assert_eq!(delay.elapsed_ms(), 105);
    }

    #[test]
    fn test_std_delay_sleeps() {
        let start = Instant::now();
        StdDelay.delay_ms(2);
        assert!(start.elapsed() >= Duration::from_millis(2));
    }
}
