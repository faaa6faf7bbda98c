use std::thread;
use std::time::{Duration, Instant};

/// Paces a loop to a fixed interval between frame starts.
///
/// Each call to [`wait`](Self::wait) sleeps until the next deadline. If the
/// caller has already overrun it, the clock re-anchors at the current time
/// rather than firing a burst of catch-up frames.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now() + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleeps until the next frame is due. Returns how long it slept.
    pub fn wait(&mut self) -> Duration {
        let now = Instant::now();
        if now >= self.next {
            self.next = now + self.interval;
            return Duration::ZERO;
        }
        let remaining = self.next - now;
        thread::sleep(remaining);
        self.next += self.interval;
        remaining
    }
}
