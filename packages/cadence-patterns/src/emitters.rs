use std::collections::VecDeque;
use std::time::Duration;

use cadence_scheduler::{Emitter, EmitterCore, EmitterError};
use crossbeam_channel::Receiver;

use crate::Burst;
use crate::rng::XorShift64;

/// Symbols a [`RandomEmitter`] picks from.
pub const RANDOM_SYMBOLS: [char; 5] = ['o', 'x', '#', '@', '*'];

/// A sleep that the emitter's stop request cuts short.
struct Pause {
    wake: Receiver<()>,
}

impl Pause {
    fn install<E>(core: &EmitterCore<E>) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);
        core.on_stop(move || {
            let _ = tx.try_send(());
        });
        Self { wake: rx }
    }

    fn sleep(&self, duration: Duration) {
        // Woken early, timed out, or the hook is gone: all mean "carry on".
        let _ = self.wake.recv_timeout(duration);
    }
}

/// Fires a `()` event every `period` (one second by default).
pub struct TestEmitter {
    core: EmitterCore<()>,
    pause: Pause,
    period: Duration,
}

impl Default for TestEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEmitter {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self::with_period(Self::DEFAULT_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        let core = EmitterCore::new();
        let pause = Pause::install(&core);
        core.on_stop(|| tracing::info!("Test emitter stopping..."));
        Self {
            core,
            pause,
            period,
        }
    }
}

impl Emitter for TestEmitter {
    type Event = ();

    fn core(&self) -> &EmitterCore<()> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EmitterCore<()> {
        &mut self.core
    }

    fn run_once(&mut self) -> Result<(), EmitterError> {
        tracing::info!("Test emitter triggering...");
        self.core.emit(());
        self.pause.sleep(self.period);
        Ok(())
    }
}

/// Fires a [`Burst`] with a random count and symbol, then waits a random
/// interval before the next one.
pub struct RandomEmitter {
    core: EmitterCore<Burst>,
    pause: Pause,
    rng: XorShift64,
    min_wait: Duration,
    max_wait: Duration,
}

impl Default for RandomEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomEmitter {
    pub const MAX_COUNT: u32 = 10;

    pub fn new() -> Self {
        Self::with_rng(XorShift64::from_clock())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(XorShift64::new(seed))
    }

    fn with_rng(rng: XorShift64) -> Self {
        let core = EmitterCore::new();
        let pause = Pause::install(&core);
        Self {
            core,
            pause,
            rng,
            min_wait: Duration::from_millis(500),
            max_wait: Duration::from_millis(1500),
        }
    }

    /// Waits are drawn uniformly from `min..=max`.
    pub fn with_wait(mut self, min: Duration, max: Duration) -> Self {
        self.min_wait = min.min(max);
        self.max_wait = max.max(min);
        self
    }

    pub fn next_burst(&mut self) -> Burst {
        let count = self.rng.range_inclusive(1, Self::MAX_COUNT);
        let symbol = self.rng.choose(&RANDOM_SYMBOLS).copied().unwrap_or('*');
        Burst::new(count, symbol)
    }

    fn next_wait(&mut self) -> Duration {
        let span = self.max_wait - self.min_wait;
        if span.is_zero() {
            return self.min_wait;
        }
        self.min_wait + span.mul_f64(self.rng.next_f64())
    }
}

impl Emitter for RandomEmitter {
    type Event = Burst;

    fn core(&self) -> &EmitterCore<Burst> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EmitterCore<Burst> {
        &mut self.core
    }

    fn run_once(&mut self) -> Result<(), EmitterError> {
        let burst = self.next_burst();
        tracing::debug!("emitting {:?}", burst);
        self.core.emit(burst);
        let wait = self.next_wait();
        self.pause.sleep(wait);
        Ok(())
    }
}

/// Replays a fixed list of events, one per iteration, then stops.
pub struct ScriptedEmitter<E> {
    core: EmitterCore<E>,
    pause: Pause,
    script: VecDeque<E>,
    spacing: Duration,
}

impl<E> ScriptedEmitter<E> {
    pub fn new(script: impl IntoIterator<Item = E>) -> Self {
        let core = EmitterCore::new();
        let pause = Pause::install(&core);
        Self {
            core,
            pause,
            script: script.into_iter().collect(),
            spacing: Duration::ZERO,
        }
    }

    /// Waits `spacing` after each event.
    pub fn with_spacing(mut self, spacing: Duration) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl<E: Send + 'static> Emitter for ScriptedEmitter<E> {
    type Event = E;

    fn core(&self) -> &EmitterCore<E> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EmitterCore<E> {
        &mut self.core
    }

    fn run_once(&mut self) -> Result<(), EmitterError> {
        let Some(event) = self.script.pop_front() else {
            tracing::debug!("script exhausted");
            self.core.stop();
            return Ok(());
        };
        self.core.emit(event);
        if !self.spacing.is_zero() {
            self.pause.sleep(self.spacing);
        }
        Ok(())
    }
}
