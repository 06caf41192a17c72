//=========================================================================
// Game Time
//=========================================================================
//
// Frame clock consumed by transitions and entity updates.
//
// Two modes:
//   Realtime → elapsed measured with `Instant` between ticks
//   Fixed    → every tick advances by exactly 1 / tps (deterministic)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

//=== GameTime ============================================================

/// Snapshot of frame timing handed to every update and draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameTime {
    /// Time since the previous frame.
    pub elapsed: Duration,
    /// Time since the clock started.
    pub total: Duration,
}

impl GameTime {
    pub const fn new(elapsed: Duration, total: Duration) -> Self {
        Self { elapsed, total }
    }

    /// Frame time with `total == elapsed`; handy for one-off updates.
    pub const fn from_elapsed(elapsed: Duration) -> Self {
        Self::new(elapsed, elapsed)
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::from_elapsed(Duration::from_millis(ms))
    }

    #[inline]
    pub fn delta_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    #[inline]
    pub fn total_seconds(&self) -> f32 {
        self.total.as_secs_f32()
    }
}

//=== GameClock ===========================================================

#[derive(Debug)]
enum ClockMode {
    Realtime { last: Option<Instant> },
    Fixed { step: Duration },
}

/// Produces one [`GameTime`] per frame.
#[derive(Debug)]
pub struct GameClock {
    mode: ClockMode,
    total: Duration,
}

impl GameClock {
    /// Clock driven by wall time. The first tick reports zero elapsed time.
    pub fn realtime() -> Self {
        Self {
            mode: ClockMode::Realtime { last: None },
            total: Duration::ZERO,
        }
    }

    /// Clock that advances by `1 / tps` seconds on every tick.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn fixed(tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        Self {
            mode: ClockMode::Fixed { step: Duration::from_secs_f64(1.0 / tps) },
            total: Duration::ZERO,
        }
    }

    /// Advances the clock and returns the new frame time.
    pub fn tick(&mut self) -> GameTime {
        let elapsed = match &mut self.mode {
            ClockMode::Realtime { last } => {
                let now = Instant::now();
                let elapsed = last.map_or(Duration::ZERO, |prev| now - prev);
                *last = Some(now);
                elapsed
            }
            ClockMode::Fixed { step } => *step,
        };

        self.total += elapsed;
        GameTime::new(elapsed, self.total)
    }

    pub fn total(&self) -> Duration {
        self.total
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
