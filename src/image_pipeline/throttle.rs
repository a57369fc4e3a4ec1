//! Frame-rate throttle
//!
//! The throttle is a plain value owned by the frame worker. Timestamps come
//! from the caller's monotonic clock, so tests can drive it with synthetic time.

use std::time::Duration;

/// Minimum spacing between processed frames, about 30 frames per second.
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameThrottle {
    min_interval: Duration,
    last_admitted: Option<Duration>,
}

impl FrameThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_admitted: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn last_admitted(&self) -> Option<Duration> {
        self.last_admitted
    }

    /// Decides whether the frame captured at `now` should be processed.
    ///
    /// Rejected frames leave the state untouched. A timestamp earlier than the
    /// last admitted one counts as zero elapsed time.
    pub fn admit(&mut self, now: Duration) -> bool {
        if let Some(last) = self.last_admitted {
            if now.saturating_sub(last) < self.min_interval {
                return false;
            }
        }
        self.last_admitted = Some(now);
        true
    }

    /// Forgets the last admitted frame, so the next one always passes.
    pub fn reset(&mut self) {
        self.last_admitted = None;
    }
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::new(MIN_FRAME_INTERVAL)
    }
}
