//! # Frame Clock
//!
//! Fixed-rate pacing for the client frame loop and the server tick loop.
//!
//! ```text
//! begin_frame() -> delta_t     time since the previous frame, clamped
//!   ... update / render ...
//! end_frame()                  record timing, sleep out the frame budget
//! ```

use std::time::{Duration, Instant};

/// Largest delta time handed to systems, in seconds.
///
/// A stall (debugger, window drag) would otherwise make the next update
/// jump by the whole stall.
pub const MAX_DELTA_T: f32 = 0.1;

/// Frame timing statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames recorded.
    pub frames: u64,
    /// Sum of frame work times in microseconds.
    pub total_us: u64,
    /// Shortest frame work time.
    pub min_frame_us: u64,
    /// Longest frame work time.
    pub max_frame_us: u64,
    /// Frames whose work took longer than the budget.
    pub late_frames: u64,
}

impl FrameStats {
    fn record(&mut self, frame_us: u64, budget_us: u64) {
        self.min_frame_us = if self.frames == 0 {
            frame_us
        } else {
            self.min_frame_us.min(frame_us)
        };
        self.max_frame_us = self.max_frame_us.max(frame_us);
        self.total_us += frame_us;
        self.frames += 1;

        if frame_us > budget_us {
            self.late_frames += 1;
        }
    }

    /// Average frame work time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        (self.total_us as f64 / self.frames as f64) / 1000.0
    }

    /// Fraction of frames over budget.
    #[must_use]
    pub fn late_ratio(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.late_frames as f64 / self.frames as f64
    }
}

/// Paces a loop to one iteration per `frame_time`.
pub struct FrameClock {
    /// Target time per frame.
    frame_time: Duration,
    /// Start of the previous frame.
    last_frame: Instant,
    /// Start of the current frame.
    frame_start: Instant,
    /// Accumulated statistics.
    stats: FrameStats,
}

impl FrameClock {
    /// Creates a clock with the given frame budget.
    #[must_use]
    pub fn new(frame_time: Duration) -> Self {
        let now = Instant::now();
        Self {
            frame_time,
            last_frame: now,
            frame_start: now,
            stats: FrameStats::default(),
        }
    }

    /// Creates a clock for `fps` frames per second.
    ///
    /// # Panics
    ///
    /// Panics if `fps` is zero.
    #[must_use]
    pub fn from_fps(fps: u32) -> Self {
        assert!(fps > 0, "fps must be greater than zero");
        Self::new(Duration::from_micros(1_000_000 / u64::from(fps)))
    }

    /// Starts a frame and returns the seconds since the previous one,
    /// clamped to [`MAX_DELTA_T`].
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_start = now;

        delta.as_secs_f32().min(MAX_DELTA_T)
    }

    /// Ends the frame: records its work time and sleeps out the rest of the
    /// budget.
    pub fn end_frame(&mut self) {
        let work = self.frame_start.elapsed();
        let work_us = u64::try_from(work.as_micros()).unwrap_or(u64::MAX);
        let budget_us = u64::try_from(self.frame_time.as_micros()).unwrap_or(u64::MAX);
        self.stats.record(work_us, budget_us);

        if let Some(remaining) = self.frame_time.checked_sub(work) {
            std::thread::sleep(remaining);
        }
    }

    /// Number of finished frames.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.stats.frames
    }

    /// Target time per frame.
    #[inline]
    #[must_use]
    pub const fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Accumulated statistics.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &FrameStats {
        &self.stats
    }
}
