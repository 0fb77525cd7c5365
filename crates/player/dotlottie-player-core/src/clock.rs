//! Time source for playback.

use instant::Instant;

/// Supplies "now" to the player; swap in a manual clock to drive playback
/// deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock (`performance.now()` on wasm).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}
