use std::fmt::Debug;
use std::io::{self, Stdout, Write};
use std::marker::PhantomData;

use cadence_scheduler::{RenderError, Renderer};

/// Prints the most recent event, verbatim, on the next frame.
///
/// Events arriving in the same frame overwrite each other; only the last
/// one is printed.
pub struct DebugRenderer<W: Write, E> {
    out: W,
    latest: Option<E>,
    printed: u64,
    _event: PhantomData<fn(E)>,
}

impl<E> DebugRenderer<Stdout, E> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write, E> DebugRenderer<W, E> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            latest: None,
            printed: 0,
            _event: PhantomData,
        }
    }

    /// How many events have been printed.
    pub fn printed(&self) -> u64 {
        self.printed
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write, E: Debug> Renderer<E> for DebugRenderer<W, E> {
    fn on_event(&mut self, event: E) {
        self.latest = Some(event);
    }

    fn tick(&mut self) -> Result<(), RenderError> {
        if let Some(event) = self.latest.take() {
            writeln!(self.out, "Event: {event:?}")?;
            self.out.flush()?;
            self.printed += 1;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Err(err) = writeln!(self.out, "Stopped the pattern.").and_then(|()| self.out.flush())
        {
            tracing::warn!("failed to write debug footer: {}", err);
        }
    }
}
