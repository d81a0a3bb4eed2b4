//! Frame clock for hosts without their own per-tick delta time.
//!
//! The pool is driven by [`VoicePool::update`](crate::VoicePool::update),
//! which takes the time elapsed since the previous tick. Engines usually
//! already know this value; `FrameClock` measures it with [`Instant`] for
//! those that don't.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! loop {
//!     pool.update(clock.tick());
//!     // ... render frame
//! }
//! ```

use std::time::{Duration, Instant};

/// Largest delta reported by default. Longer stalls (debugger breaks,
/// window drags) are clamped so fades don't complete in a single jump.
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(250);

/// Measures the wall-clock time between successive ticks.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_tick: Option<Instant>,
    max_delta: Duration,
    tick_count: u64,
}

impl FrameClock {
    /// Create a clock with the default delta clamp.
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_DELTA)
    }

    /// Create a clock that never reports more than `max_delta` per tick.
    pub fn with_max_delta(max_delta: Duration) -> Self {
        Self {
            last_tick: None,
            max_delta,
            tick_count: 0,
        }
    }

    /// Mark a new tick and return the time elapsed since the previous one.
    ///
    /// The first tick after creation or [`reset`](Self::reset) returns zero.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);
        self.tick_count += 1;
        delta.min(self.max_delta)
    }

    /// Number of ticks since creation or the last reset.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Forget the previous tick, e.g. after the game was paused.
    pub fn reset(&mut self) {
        self.last_tick = None;
        self.tick_count = 0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
