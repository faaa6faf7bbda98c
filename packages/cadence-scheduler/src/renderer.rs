use crate::error::RenderError;

/// Stateful consumer of events that produces one visible effect per frame.
///
/// All three methods are called from the scheduler's frame thread only and
/// never concurrently. Within a frame, every `on_event` call precedes the
/// frame's `tick`. `stop` is called once, after the last `tick`.
pub trait Renderer<E> {
    /// Folds one dequeued event into the renderer's state.
    fn on_event(&mut self, event: E);

    /// Draws the current state and advances any per-frame decay.
    fn tick(&mut self) -> Result<(), RenderError>;

    /// Releases resources and flushes output.
    fn stop(&mut self) {}
}

impl<E, R: Renderer<E> + ?Sized> Renderer<E> for Box<R> {
    fn on_event(&mut self, event: E) {
        (**self).on_event(event);
    }

    fn tick(&mut self) -> Result<(), RenderError> {
        (**self).tick()
    }

    fn stop(&mut self) {
        (**self).stop();
    }
}
