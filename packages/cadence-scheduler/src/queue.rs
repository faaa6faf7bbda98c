use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::emitter::Listener;

/// Unbounded FIFO between the emitter thread and the frame loop.
///
/// Pushing never blocks and draining never waits for more events. There is
/// no backpressure: if the frame loop consumes slower than the emitter
/// produces, the queue grows without limit. Capping it would mean silently
/// dropping events, so the only safeguard offered is
/// [`drain_at_most`](Self::drain_at_most), which bounds the work done in a
/// single frame and leaves the remainder queued.
pub struct EventQueue<E> {
    tx: Sender<E>,
    rx: Receiver<E>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// A write handle that can be moved to the producer thread.
    pub fn sink(&self) -> EventSink<E> {
        EventSink {
            tx: self.tx.clone(),
        }
    }

    pub fn push(&self, event: E) {
        // The queue holds its own receiver, so this cannot disconnect.
        let _ = self.tx.send(event);
    }

    pub fn try_pop(&self) -> Option<E> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Hands every queued event to `handler` in push order.
    ///
    /// Stops as soon as the queue is observed empty. Events pushed while the
    /// drain is in progress may or may not be included; whatever is missed
    /// is picked up by the next drain. Returns the number of events handled.
    pub fn drain_all(&self, mut handler: impl FnMut(E)) -> usize {
        let mut handled = 0;
        while let Some(event) = self.try_pop() {
            handler(event);
            handled += 1;
        }
        handled
    }

    /// Like [`drain_all`](Self::drain_all) but handles at most `limit`
    /// events, leaving the rest for a later drain.
    pub fn drain_at_most(&self, limit: usize, mut handler: impl FnMut(E)) -> usize {
        let mut handled = 0;
        while handled < limit {
            match self.try_pop() {
                Some(event) => {
                    handler(event);
                    handled += 1;
                }
                None => break,
            }
        }
        handled
    }
}

/// Producer-side handle into an [`EventQueue`].
pub struct EventSink<E> {
    tx: Sender<E>,
}

impl<E> Clone for EventSink<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E: Send + 'static> EventSink<E> {
    /// Enqueues `event`. Never blocks; if the queue has been dropped the
    /// event is discarded.
    pub fn push(&self, event: E) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event queue is gone, dropping event");
        }
    }

    /// Wraps this sink as the listener callback an emitter invokes.
    pub fn into_listener(self) -> Listener<E> {
        Box::new(move |event| self.push(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_outliving_queue_drops_silently() {
        let queue = EventQueue::new();
        let sink = queue.sink();
        sink.push(1);
        assert_eq!(queue.len(), 1);
        drop(queue);
        sink.push(2);
    }

    #[test]
    fn try_pop_reports_empty() {
        let queue: EventQueue<u8> = EventQueue::new();
        assert!(queue.try_pop().is_none());
        queue.push(7);
        assert_eq!(queue.try_pop(), Some(7));
        assert!(queue.try_pop().is_none());
    }
}
