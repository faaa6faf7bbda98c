use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::clock::FrameClock;
use crate::config::SchedulerConfig;
use crate::emitter::{Emitter, EmitterControl, EmitterHandle};
use crate::error::{EmitterError, SchedulerError};
use crate::queue::EventQueue;
use crate::renderer::Renderer;

const EMITTER_THREAD_NAME: &str = "cadence-emitter";
const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    Running,
    Stopping,
    Stopped,
}

/// Asks a running scheduler to shut down. Safe to use from any thread.
///
/// The request only flips a flag; the frame thread notices it at the next
/// loop boundary and runs the orderly shutdown itself, so the renderer is
/// never touched off its own thread.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

type EmitterThread = JoinHandle<Result<(), EmitterError>>;

/// Drives a [`Renderer`] at a fixed frame rate from events produced by an
/// [`Emitter`] running on a background thread.
pub struct Scheduler<Em, R>
where
    Em: Emitter,
    R: Renderer<Em::Event>,
{
    emitter: Option<Em>,
    emitter_handle: EmitterHandle,
    renderer: R,
    queue: EventQueue<Em::Event>,
    config: SchedulerConfig,
    interval: Duration,
    phase: Phase,
    stop: StopHandle,
    thread: Option<EmitterThread>,
    frame: u64,
}

impl<Em, R> Scheduler<Em, R>
where
    Em: Emitter,
    R: Renderer<Em::Event>,
{
    pub fn new(emitter: Em, renderer: R, frames_per_second: f64) -> Result<Self, SchedulerError> {
        Self::with_config(emitter, renderer, SchedulerConfig::new(frames_per_second))
    }

    /// Validates `config` and wires the emitter's listener into a fresh
    /// queue. No thread is started until [`loop_forever`](Self::loop_forever).
    pub fn with_config(
        mut emitter: Em,
        renderer: R,
        config: SchedulerConfig,
    ) -> Result<Self, SchedulerError> {
        let interval = config.frame_interval()?;
        let queue = EventQueue::new();
        emitter.set_listener(queue.sink().into_listener());
        let emitter_handle = emitter.handle();

        Ok(Self {
            emitter: Some(emitter),
            emitter_handle,
            renderer,
            queue,
            config,
            interval,
            phase: Phase::Created,
            stop: StopHandle::default(),
            thread: None,
            frame: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Same as [`loop_forever`](Self::loop_forever).
    pub fn run(&mut self) -> Result<(), SchedulerError> {
        self.loop_forever()
    }

    /// Starts the emitter thread and runs the frame loop on the calling
    /// thread until a stop is requested, the frame limit is hit, or the
    /// renderer fails. The orderly shutdown always runs before returning.
    pub fn loop_forever(&mut self) -> Result<(), SchedulerError> {
        if self.phase != Phase::Created {
            return Err(SchedulerError::AlreadyStarted(self.phase));
        }
        let Some(mut emitter) = self.emitter.take() else {
            return Err(SchedulerError::AlreadyStarted(self.phase));
        };

        let spawned = thread::Builder::new()
            .name(EMITTER_THREAD_NAME.to_string())
            .spawn(move || {
                let result = emitter.run_loop();
                match &result {
                    Ok(()) => tracing::debug!("emitter loop finished"),
                    Err(err) => tracing::warn!("emitter loop failed: {}", err),
                }
                result
            });
        let thread = match spawned {
            Ok(thread) => thread,
            Err(err) => {
                self.phase = Phase::Stopped;
                return Err(SchedulerError::Spawn(err));
            }
        };

        self.thread = Some(thread);
        self.phase = Phase::Running;
        tracing::info!(
            "Animation started at {} fps ({:?} per frame)",
            self.config.frames_per_second,
            self.interval
        );

        let outcome = self.run_frames();
        let stopped = self.stop();

        match (outcome, stopped) {
            (Err(err), Err(stop_err)) => {
                tracing::warn!("shutdown after render failure also failed: {}", stop_err);
                Err(err)
            }
            (Err(err), Ok(())) => Err(err),
            (Ok(()), stopped) => stopped,
        }
    }

    fn run_frames(&mut self) -> Result<(), SchedulerError> {
        let mut clock = FrameClock::new(self.interval);
        while !self.stop.is_stop_requested() && !self.frame_limit_reached() {
            self.drain();
            self.renderer.tick()?;
            self.frame += 1;
            clock.wait();
        }
        Ok(())
    }

    fn frame_limit_reached(&self) -> bool {
        self.config
            .max_frames
            .is_some_and(|limit| self.frame >= limit)
    }

    fn drain(&mut self) -> usize {
        let renderer = &mut self.renderer;
        let handled = match self.config.max_events_per_frame {
            Some(limit) => self.queue.drain_at_most(limit, |event| renderer.on_event(event)),
            None => self.queue.drain_all(|event| renderer.on_event(event)),
        };
        if handled > 0 {
            tracing::trace!("frame {}: delivered {} events", self.frame + 1, handled);
        }
        handled
    }

    /// Shuts the animation down: stops the frame loop, then the renderer,
    /// then the emitter, and waits for the emitter thread to exit.
    ///
    /// Does nothing if the scheduler never started or already stopped.
    /// Errors from the emitter thread are reported here.
    pub fn stop(&mut self) -> Result<(), SchedulerError> {
        if self.phase != Phase::Running {
            return Ok(());
        }
        self.phase = Phase::Stopping;
        self.stop.request_stop();

        self.renderer.stop();
        tracing::info!("Animation stopped after {} frames. Stopping emitter...", self.frame);
        // Same as `EmitterControl::stop` on the emitter itself, which now
        // lives on the background thread. Runs the emitter's stop hooks.
        self.emitter_handle.stop();

        let joined = self.join_emitter();
        self.phase = Phase::Stopped;
        if joined.is_ok() {
            tracing::info!("Done.");
        }
        joined
    }

    fn join_emitter(&mut self) -> Result<(), SchedulerError> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        if let Some(timeout) = self.config.join_timeout {
            let deadline = Instant::now() + timeout;
            while !thread.is_finished() {
                if Instant::now() >= deadline {
                    tracing::warn!(
                        "emitter did not stop within {:?}, leaving its thread detached",
                        timeout
                    );
                    return Err(SchedulerError::ShutdownTimeout(timeout));
                }
                thread::sleep(JOIN_POLL_INTERVAL);
            }
        }

        match thread.join() {
            Ok(result) => result.map_err(SchedulerError::from),
            Err(_) => {
                tracing::error!("emitter thread panicked");
                Err(SchedulerError::EmitterPanicked)
            }
        }
    }
}

impl<Em, R> Drop for Scheduler<Em, R>
where
    Em: Emitter,
    R: Renderer<Em::Event>,
{
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.emitter_handle.stop();
            if let Err(err) = self.join_emitter() {
                tracing::warn!("emitter shutdown during drop failed: {}", err);
            }
        }
    }
}

impl<Em, R> std::fmt::Debug for Scheduler<Em, R>
where
    Em: Emitter,
    R: Renderer<Em::Event>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("phase", &self.phase)
            .field("frame", &self.frame)
            .field("pending_events", &self.queue.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::OneShot;
    use crate::error::RenderError;

    #[derive(Default)]
    struct Counting {
        ticks: u64,
        stops: u32,
    }

    impl Renderer<()> for Counting {
        fn on_event(&mut self, _event: ()) {}

        fn tick(&mut self) -> Result<(), RenderError> {
            self.ticks += 1;
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    #[test]
    fn walks_through_every_phase() {
        let config = SchedulerConfig::new(1000.0).with_max_frames(3);
        let mut scheduler =
            Scheduler::with_config(OneShot::<()>::new(), Counting::default(), config).unwrap();
        assert_eq!(scheduler.phase(), Phase::Created);

        scheduler.loop_forever().unwrap();

        assert_eq!(scheduler.phase(), Phase::Stopped);
        assert_eq!(scheduler.frame(), 3);
        assert_eq!(scheduler.renderer().ticks, 3);
        assert_eq!(scheduler.renderer().stops, 1);
        assert!(scheduler.thread.is_none());
    }

    #[test]
    fn second_stop_is_a_no_op() {
        let config = SchedulerConfig::new(1000.0).with_max_frames(1);
        let mut scheduler =
            Scheduler::with_config(OneShot::<()>::new(), Counting::default(), config).unwrap();
        scheduler.loop_forever().unwrap();
        scheduler.stop().unwrap();
        assert_eq!(scheduler.renderer().stops, 1);
    }
}
