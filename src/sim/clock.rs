//! Frame timing
//!
//! The simulation is tuned in 60 Hz frames: a display refreshing at ~60 Hz
//! produces `dt ≈ 1`. The [`Scheduler`] capability hides where timestamps and
//! frame callbacks come from, so the loop can be driven by
//! `requestAnimationFrame` in the browser or stepped deterministically in tests.

use crate::consts::{BASELINE_FRAME_MS, MAX_FRAME_DT};

/// Normalized, clamped frame delta between two millisecond timestamps.
///
/// Negative deltas (clock went backwards) yield 0, long pauses yield
/// [`MAX_FRAME_DT`].
pub fn frame_delta(previous_ms: f64, now_ms: f64) -> f32 {
    let dt = ((now_ms - previous_ms) / BASELINE_FRAME_MS) as f32;
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, MAX_FRAME_DT)
}

/// Source of time and next-frame callbacks
pub trait Scheduler {
    /// Current timestamp in milliseconds
    fn now(&self) -> f64;
    /// Ask for one more frame callback. Idempotent until the request is taken.
    fn request_frame(&mut self);
    /// Consume a pending request (called by whatever actually drives frames)
    fn take_frame_request(&mut self) -> bool;
}

/// Deterministic scheduler advancing a fixed step per frame
#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    time_ms: f64,
    step_ms: f64,
    pending: bool,
}

impl Default for FixedStepScheduler {
    fn default() -> Self {
        Self::new(BASELINE_FRAME_MS)
    }
}

impl FixedStepScheduler {
    pub fn new(step_ms: f64) -> Self {
        Self {
            time_ms: 0.0,
            step_ms,
            pending: false,
        }
    }

    /// Advance the clock by one step and return the new timestamp
    pub fn advance(&mut self) -> f64 {
        self.time_ms += self.step_ms;
        self.time_ms
    }

    /// Jump the clock by an arbitrary amount (simulates stalls)
    pub fn skip(&mut self, ms: f64) {
        self.time_ms += ms;
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }
}

impl Scheduler for FixedStepScheduler {
    fn now(&self) -> f64 {
        self.time_ms
    }

    fn request_frame(&mut self) {
        self.pending = true;
    }

    fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
