//! Frame clock.
//!
//! Feeds `elapsed` and `delta` into each [`FrameSnapshot`](crate::FrameSnapshot).
//! The clock stops while the window is hidden so the drift phase and the
//! physics step don't jump when it comes back.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! // each redraw:
//! let (elapsed, delta) = clock.tick();
//! ```

use std::time::{Duration, Instant};

/// Elapsed and per-frame time for the render loop.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    /// Time spent paused, excluded from `elapsed`.
    pause_elapsed: Duration,
}

impl FrameClock {
    /// Start a clock now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            pause_elapsed: Duration::ZERO,
        }
    }

    /// Advance to a new frame. Returns `(elapsed, delta)` in seconds.
    ///
    /// While paused, `delta` is 0 and `elapsed` holds still.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();

        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }

        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.elapsed_secs = (now.duration_since(self.start) - self.pause_elapsed).as_secs_f32();
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames ticked since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop the clock.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Restart the clock, discarding the time spent paused.
    pub fn resume(&mut self) {
        if self.paused {
            let now = Instant::now();
            self.pause_elapsed += now.duration_since(self.last_frame);
            self.last_frame = now;
            self.paused = false;
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_clock_tick() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = clock.tick();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_clock_pause() {
        let mut clock = FrameClock::new();
        clock.tick();

        clock.pause();
        let elapsed_before = clock.elapsed();
        thread::sleep(Duration::from_millis(10));
        clock.tick();

        assert_eq!(clock.elapsed(), elapsed_before);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_resume_skips_paused_time() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.pause();
        thread::sleep(Duration::from_millis(50));
        clock.resume();

        let (_, delta) = clock.tick();
        assert!(delta < 0.04, "delta {} includes paused time", delta);
    }
}
