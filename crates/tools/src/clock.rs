use std::time::{Duration, Instant};

/// Measures time between frames with a monotonic clock.
///
/// Long stalls (debugger breaks, window drags) are clamped to `max_dt` so the
/// camera does not teleport on the next frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self::starting_at(Instant::now(), max_dt)
    }

    pub fn starting_at(start: Instant, max_dt: f32) -> Self {
        Self {
            last: start,
            max_dt,
        }
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Seconds between the previous tick and `now`, clamped to `[0, max_dt]`.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        dt.min(self.max_dt)
    }

    /// Restart timing without producing a frame, e.g. after a long pause.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }
}

/// Smoothed frame statistics for the overlay.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frames: u64,
    last_dt: f32,
    smoothed_dt: f32,
    render_time: Duration,
}

impl FrameStats {
    /// Weight of the newest sample in the moving average.
    const SMOOTHING: f32 = 0.1;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, dt: f32, render_time: Duration) {
        self.frames += 1;
        self.last_dt = dt;
        self.render_time = render_time;
        self.smoothed_dt = if self.frames == 1 {
            dt
        } else {
            self.smoothed_dt + (dt - self.smoothed_dt) * Self::SMOOTHING
        };
        if self.frames % 600 == 0 {
            tracing::debug!(fps = self.fps(), frames = self.frames, "frame stats");
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_dt(&self) -> f32 {
        self.last_dt
    }

    /// Time spent producing the last frame's image.
    pub fn render_time(&self) -> Duration {
        self.render_time
    }

    /// Smoothed frames per second, or zero before any timed frame.
    pub fn fps(&self) -> f32 {
        if self.smoothed_dt > 0.0 {
            1.0 / self.smoothed_dt
        } else {
            0.0
        }
    }
}
