use std::time::{Duration, Instant};

/// Wall-clock timing for one host tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTime {
    /// Time since the previous tick.
    pub delta: Duration,
    /// Time since the clock started.
    pub total: Duration,
}

impl FrameTime {
    pub fn from_millis(delta_ms: u64, total_ms: u64) -> Self {
        Self {
            delta: Duration::from_millis(delta_ms),
            total: Duration::from_millis(total_ms),
        }
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

/// Game-visible time, stamped from the host frame time once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameTime {
    pub total: Duration,
    pub delta: Duration,
}

impl GameTime {
    pub fn stamp(&mut self, frame: FrameTime) {
        self.total = frame.total;
        self.delta = frame.delta;
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

/// Turns host `Instant` readings into per-tick `FrameTime` values.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last: now }
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let frame = FrameTime {
            delta: now - self.last,
            total: now - self.start,
        };
        self.last = now;
        frame
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame counter with one-second FPS sampling.
///
/// `tick` accumulates whole frames and elapsed time; once the window reaches
/// one second the frame count becomes the new sample and both accumulators
/// reset. The running frame count is readable between samples.
#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: Duration,
    sample: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one frame. Returns true when a new FPS sample was taken.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.frames += 1;
        self.elapsed += delta;
        if self.elapsed >= Duration::from_millis(1000) {
            self.sample = self.frames;
            self.frames = 0;
            self.elapsed = Duration::ZERO;
            true
        } else {
            false
        }
    }

    /// Frames counted since the last sample.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Most recent FPS sample, zero until the first full window.
    pub fn sample(&self) -> u32 {
        self.sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_time_from_millis() {
        let frame = FrameTime::from_millis(16, 160);
        assert_eq!(frame.delta, Duration::from_millis(16));
        assert_eq!(frame.total, Duration::from_millis(160));
    }

    #[test]
    fn game_time_stamps_from_frame() {
        let mut time = GameTime::default();
        time.stamp(FrameTime::from_millis(16, 500));
        assert_eq!(time.delta, Duration::from_millis(16));
        assert_eq!(time.total, Duration::from_millis(500));
    }

    #[test]
    fn frame_clock_totals_grow() {
        let mut clock = FrameClock::new();
        let first = clock.tick();
        let second = clock.tick();
        assert!(second.total >= first.total);
    }

    #[test]
    fn fps_samples_after_one_second() {
        let mut fps = FpsCounter::new();
        // 60 frames at 16.75 ms crosses 1000 ms on the final tick.
        for i in 0..60 {
            let sampled = fps.tick(Duration::from_micros(16_750));
            assert_eq!(sampled, i == 59, "tick {i}");
        }
        assert_eq!(fps.sample(), 60);
        assert_eq!(fps.frames(), 0);
    }

    #[test]
    fn fps_does_not_sample_under_a_second() {
        let mut fps = FpsCounter::new();
        for _ in 0..30 {
            assert!(!fps.tick(Duration::from_millis(16)));
        }
        assert_eq!(fps.sample(), 0);
        assert_eq!(fps.frames(), 30);
    }

    #[test]
    fn fps_window_resets_between_samples() {
        let mut fps = FpsCounter::new();
        for _ in 0..10 {
            fps.tick(Duration::from_millis(100));
        }
        assert_eq!(fps.sample(), 10);
        for _ in 0..5 {
            fps.tick(Duration::from_millis(100));
        }
        assert_eq!(fps.sample(), 10);
        assert_eq!(fps.frames(), 5);
    }
}
