use std::time::Duration;

use crate::error::SchedulerError;

/// Frame rate used when none is given.
pub const DEFAULT_FRAMES_PER_SECOND: f64 = 120.0;

/// Tunables for a [`Scheduler`](crate::Scheduler).
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// How often the renderer ticks. Must be finite and strictly positive.
    pub frames_per_second: f64,
    /// Cap on events delivered per frame. `None` drains until empty.
    pub max_events_per_frame: Option<usize>,
    /// Stop on its own after this many frames.
    pub max_frames: Option<u64>,
    /// Give up waiting for the emitter thread after this long. `None` waits
    /// indefinitely.
    pub join_timeout: Option<Duration>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            max_events_per_frame: None,
            max_frames: None,
            join_timeout: None,
        }
    }
}

impl SchedulerConfig {
    pub fn new(frames_per_second: f64) -> Self {
        Self {
            frames_per_second,
            ..Self::default()
        }
    }

    pub fn with_max_events_per_frame(mut self, limit: usize) -> Self {
        self.max_events_per_frame = Some(limit);
        self
    }

    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = Some(timeout);
        self
    }

    pub fn validate(&self) -> Result<(), SchedulerError> {
        let fps = self.frames_per_second;
        if !fps.is_finite() || fps <= 0.0 {
            return Err(SchedulerError::InvalidFrameRate(fps));
        }
        Ok(())
    }

    /// Target time between frame starts.
    pub fn frame_interval(&self) -> Result<Duration, SchedulerError> {
        self.validate()?;
        Duration::try_from_secs_f64(1.0 / self.frames_per_second)
            .map_err(|_| SchedulerError::InvalidFrameRate(self.frames_per_second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_about_eight_millis() {
        let interval = SchedulerConfig::default().frame_interval().unwrap();
        assert_eq!(interval.as_micros(), 8333);
    }

    #[test]
    fn rejects_non_positive_and_non_finite_rates() {
        for fps in [0.0, -1.0, -120.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    SchedulerConfig::new(fps).validate(),
                    Err(SchedulerError::InvalidFrameRate(_))
                ),
                "fps {fps} should be rejected"
            );
        }
    }
}
