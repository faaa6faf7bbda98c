use std::time::Duration;

use thiserror::Error;

use crate::scheduler::Phase;

/// Failure raised by an emitter's `run_once`.
#[derive(Debug, Error)]
pub enum EmitterError {
    #[error("emitter I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("emitter failed: {0}")]
    Failed(String),
}

/// Failure raised by a renderer's `tick`.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render output failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("render failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("frames_per_second must be a finite value > 0, got {0}")]
    InvalidFrameRate(f64),

    #[error("scheduler cannot start from the {0:?} phase")]
    AlreadyStarted(Phase),

    #[error("failed to spawn emitter thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("emitter thread panicked")]
    EmitterPanicked,

    #[error(transparent)]
    Emitter(#[from] EmitterError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("emitter did not stop within {0:?}")]
    ShutdownTimeout(Duration),
}
