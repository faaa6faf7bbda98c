//! Event-driven animation scheduling.
//!
//! An [`Emitter`] runs on its own background thread and pushes events into an
//! [`EventQueue`]. The [`Scheduler`] owns that queue and runs a fixed-rate
//! frame loop on the calling thread: every frame it drains whatever is queued
//! into the [`Renderer`], then calls [`Renderer::tick`] once.
//!
//! Renderer methods are only ever called from the frame thread, so renderer
//! implementations need no internal locking.

pub mod clock;
pub mod config;
pub mod emitter;
pub mod error;
pub mod queue;
pub mod renderer;
pub mod scheduler;

pub use clock::FrameClock;
pub use config::SchedulerConfig;
pub use emitter::{Emitter, EmitterControl, EmitterCore, EmitterHandle, Listener, OneShot};
pub use error::{EmitterError, RenderError, SchedulerError};
pub use queue::{EventQueue, EventSink};
pub use renderer::Renderer;
pub use scheduler::{Phase, Scheduler, StopHandle};
