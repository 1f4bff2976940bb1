//! Fixed-timestep game clock and fixed-rate periodic timers.
//!
//! `draw_web()` calls at ~60fps with variable delta. [`GameTime`] converts
//! this into a fixed number of discrete ticks per second; [`Interval`]
//! turns a tick stream into "fire every N ticks" events. Both are pure and
//! driven by the caller, so game logic stays deterministic and testable.
//!
//! Two tick streams come out of each frame. World ticks follow the wall
//! clock so the 1 s and 2 s game timers keep their rate on slow frames;
//! UI ticks are clamped so animations do not skip ahead after a stall.

/// Game ticks per real-time second.
pub const TICKS_PER_SEC: u32 = 10;

/// Longest frame delta fed to animations (ms).
const MAX_FRAME_DELTA_MS: f64 = 500.0;

/// Longest gap the game timers catch up on in one frame (ms).
const MAX_CATCH_UP_MS: f64 = 5.0 * 60.0 * 1000.0;

/// Ticks produced by one [`GameTime::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameTicks {
    /// Wall-clock ticks for regeneration and auto-tap.
    pub world: u32,
    /// Clamped ticks for flashes, particles and prompts.
    pub ui: u32,
}

pub struct GameTime {
    /// Milliseconds per tick (e.g. 100ms = 10 ticks/sec)
    ms_per_tick: f64,
    /// Unconsumed milliseconds of the world stream
    world_acc: f64,
    /// Unconsumed milliseconds of the UI stream
    ui_acc: f64,
    /// Total elapsed world ticks since creation
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec as f64,
            world_acc: 0.0,
            ui_acc: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed wall-clock timestamp (from `performance.now()`).
    /// Returns the discrete ticks to process this frame.
    pub fn update(&mut self, now_ms: f64) -> FrameTicks {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        let world = drain(
            &mut self.world_acc,
            delta.min(MAX_CATCH_UP_MS),
            self.ms_per_tick,
        );
        let ui = drain(
            &mut self.ui_acc,
            delta.min(MAX_FRAME_DELTA_MS),
            self.ms_per_tick,
        );
        self.total_ticks += world as u64;
        FrameTicks { world, ui }
    }
}

fn drain(acc: &mut f64, delta: f64, ms_per_tick: f64) -> u32 {
    *acc += delta;
    let ticks = (*acc / ms_per_tick) as u32;
    *acc -= ticks as f64 * ms_per_tick;
    ticks
}

/// A fixed-rate timer measured in ticks.
///
/// Each call to [`advance`](Interval::advance) returns how many whole
/// periods elapsed; leftover ticks carry over to the next call.
#[derive(Clone, Debug)]
pub struct Interval {
    period: u32,
    elapsed: u32,
}

impl Interval {
    pub fn new(period: u32) -> Self {
        Self {
            period: period.max(1),
            elapsed: 0,
        }
    }

    /// Advance by `ticks`; returns the number of times the timer fired.
    pub fn advance(&mut self, ticks: u32) -> u32 {
        let total = self.elapsed as u64 + ticks as u64;
        let fired = total / self.period as u64;
        self.elapsed = (total % self.period as u64) as u32;
        fired as u32
    }

    /// Restart the current period from zero.
    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}
