//! # Delay
//!
//! Hardware abstraction for the console's cooperative yield.
//!
//! ## Philosophy
//!
//! **Time is a service, not a global variable.**
//!
//! The console loop sleeps briefly between polls so the board's background
//! tasks (USB, display DMA) get a turn. The sleep is a courtesy, not a
//! correctness requirement: it guarantees only that at least the requested
//! time passes.

/// Delay provider trait
///
/// # Implementation Notes
///
/// - May block the calling thread for at least `ms` milliseconds
/// - Must not fail
/// - Simulated implementations may return immediately and only account time
pub trait Delay {
    /// Blocks for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u64);
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay_ms(&mut self, ms: u64) {
        (**self).delay_ms(ms)
    }
}
