use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::EmitterError;

/// The single callback an emitter forwards its events to.
pub type Listener<E> = Box<dyn Fn(E) + Send + 'static>;

type StopHook = Arc<dyn Fn() + Send + Sync>;

/// Thread-safe control over an emitter's `active` flag.
///
/// The scheduler grabs one of these before moving the emitter onto its
/// background thread so it can still ask the emitter to stop. All clones
/// share the flag and the stop hooks, including hooks registered later.
#[derive(Clone)]
pub struct EmitterHandle {
    active: Arc<AtomicBool>,
    hooks: Arc<Mutex<Vec<StopHook>>>,
}

impl EmitterHandle {
    fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
            hooks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn hooks(&self) -> MutexGuard<'_, Vec<StopHook>> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Requests the emitter loop to finish. A `run_once` already in progress
    /// completes first; the registered stop hooks run afterwards so a
    /// blocked call can be forced to return.
    ///
    /// Only the first call runs the hooks.
    pub fn stop(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        // Run outside the lock so a hook may register another one.
        let hooks: Vec<StopHook> = self.hooks().clone();
        for hook in hooks {
            hook();
        }
    }

    fn add_hook(&self, hook: StopHook) {
        {
            let mut hooks = self.hooks();
            if self.is_active() {
                hooks.push(hook);
                return;
            }
        }
        hook();
    }

    fn mark_inactive(&self) {
        self.active.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for EmitterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitterHandle")
            .field("active", &self.is_active())
            .field("stop_hooks", &self.hooks().len())
            .finish()
    }
}

/// State shared by every emitter: the listener slot and the run flag.
pub struct EmitterCore<E> {
    listener: Option<Listener<E>>,
    handle: EmitterHandle,
}

impl<E> Default for EmitterCore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EmitterCore<E> {
    pub fn new() -> Self {
        Self {
            listener: None,
            handle: EmitterHandle::new(),
        }
    }

    /// Registers a hook run when the emitter is stopped, e.g. to close a
    /// socket the emitter is blocked reading from.
    ///
    /// Safe to call at any time, including from inside `run_once`: every
    /// handle already given out sees the hook. If the emitter has already
    /// been stopped, the hook runs immediately.
    pub fn on_stop(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.handle.add_hook(Arc::new(hook));
    }

    /// Replaces the listener. There is only ever one.
    pub fn set_listener(&mut self, listener: Listener<E>) {
        self.listener = Some(listener);
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Forwards `event` to the listener, or drops it if none is registered.
    pub fn emit(&self, event: E) {
        if let Some(listener) = &self.listener {
            listener(event);
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    pub fn stop(&self) {
        self.handle.stop();
    }

    pub fn handle(&self) -> EmitterHandle {
        self.handle.clone()
    }
}

/// A producer of events, driven by `run_loop` on a background thread.
///
/// Implementors embed an [`EmitterCore`] and override
/// [`run_once`](Emitter::run_once). How `run_once` failures are handled is up
/// to the implementor: swallow and log them to keep going, or return them to
/// end the loop. A returned error marks the emitter inactive and is reported
/// to whoever joins the thread.
///
/// Stopping lives on [`EmitterControl`], which cannot be overridden: once
/// the emitter runs on its own thread the scheduler can only reach it
/// through its [`EmitterHandle`]. An emitter that must unblock itself on
/// stop (disconnect, wake a sleep) registers a hook with
/// [`EmitterCore::on_stop`].
pub trait Emitter: Send + 'static {
    type Event: Send + 'static;

    fn core(&self) -> &EmitterCore<Self::Event>;

    fn core_mut(&mut self) -> &mut EmitterCore<Self::Event>;

    /// Performs one unit of work, which may block. The default stops the
    /// emitter immediately, giving a one-shot emitter that never fires.
    fn run_once(&mut self) -> Result<(), EmitterError> {
        self.core().stop();
        Ok(())
    }

    fn run_loop(&mut self) -> Result<(), EmitterError> {
        while self.core().is_active() {
            if let Err(err) = self.run_once() {
                self.core().handle.mark_inactive();
                return Err(err);
            }
        }
        Ok(())
    }

    fn set_listener(&mut self, listener: Listener<Self::Event>) {
        self.core_mut().set_listener(listener);
    }

    fn emit(&self, event: Self::Event) {
        self.core().emit(event);
    }
}

/// Run-flag control shared by every [`Emitter`].
pub trait EmitterControl {
    /// Asks the emitter to finish after its current iteration and runs its
    /// stop hooks.
    fn stop(&self);

    fn is_active(&self) -> bool;

    fn handle(&self) -> EmitterHandle;
}

impl<T: Emitter + ?Sized> EmitterControl for T {
    fn stop(&self) {
        self.core().stop();
    }

    fn is_active(&self) -> bool {
        self.core().is_active()
    }

    fn handle(&self) -> EmitterHandle {
        self.core().handle()
    }
}

/// Emitter that terminates on its first iteration without emitting.
pub struct OneShot<E> {
    core: EmitterCore<E>,
    _event: PhantomData<fn() -> E>,
}

impl<E> Default for OneShot<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> OneShot<E> {
    pub fn new() -> Self {
        Self {
            core: EmitterCore::new(),
            _event: PhantomData,
        }
    }
}

impl<E: Send + 'static> Emitter for OneShot<E> {
    type Event = E;

    fn core(&self) -> &EmitterCore<E> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EmitterCore<E> {
        &mut self.core
    }
}
