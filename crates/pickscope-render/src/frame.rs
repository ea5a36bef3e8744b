//! Per-frame timing and an explicitly started/stopped frame loop.
//!
//! The host drives the loop from its frame-presentation signal by calling
//! [`FrameLoop::tick`]; the loop itself never schedules anything.

use std::time::Instant;

/// Measures the time between successive frames.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call; `0.0` on the first call.
    pub fn delta(&mut self, now: Instant) -> f32 {
        let delta = self
            .last
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.last = Some(now);
        delta
    }

    /// Forgets the previous frame time.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// A frame loop with an explicit lifecycle.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    clock: FrameClock,
    running: bool,
    frames: u64,
}

impl FrameLoop {
    /// Creates a stopped loop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts ticking. The first tick after a start has a zero delta.
    pub fn start(&mut self) {
        if !self.running {
            self.clock.reset();
            self.running = true;
            log::info!("frame loop started");
        }
    }

    /// Stops ticking; later ticks are ignored until the next start.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::info!("frame loop stopped after {} frames", self.frames);
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of frames ticked so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Advances one frame, returning its time delta in seconds.
    ///
    /// Returns `None` while stopped.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        if !self.running {
            return None;
        }
        self.frames += 1;
        Some(self.clock.delta(now))
    }
}
