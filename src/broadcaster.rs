use crate::cell::{Cell, Slot};
use crate::receiver::Receiver;
use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use std::sync::Arc;

/// Creates a broadcaster together with its first receiver.
///
/// Equivalent to calling [`Broadcaster::new`] followed by
/// [`Broadcaster::listen`]. More receivers can be attached at any time with
/// [`Broadcaster::listen`] or [`Receiver::fork`].
pub fn broadcast<T>() -> (Broadcaster<T>, Receiver<T>) {
    let broadcaster = Broadcaster::new();
    let receiver = broadcaster.listen();
    (broadcaster, receiver)
}

/// The publishing side of the broadcast chain.
///
/// Every value passed to [`Broadcaster::write`] is delivered, in order, to
/// every receiver that was listening when it was written. Nothing is ever
/// dropped, and a slow receiver never delays the writer or any other
/// receiver.
///
/// This channel provides **no backpressure**. The cost of a receiver that
/// stops reading is memory: every value published after its cursor stays
/// resident until it catches up or is dropped.
///
/// # Producers
///
/// `write` takes `&self`, so several producer threads may share one
/// broadcaster (by reference or behind an `Arc`). Writes are serialized by an
/// internal lock; the global order is the order in which `write` calls
/// acquire it.
///
/// # Dropping
///
/// Dropping the broadcaster closes the chain. Receivers still read every
/// value published before the drop, then observe
/// [`Disconnected`](crate::Disconnected).
#[derive(Debug)]
pub struct Broadcaster<T> {
    /// The pending cell the next `write` fills.
    tail: CachePadded<Mutex<Arc<Cell<T>>>>,
}

impl<T> Broadcaster<T> {
    /// Creates a broadcaster with no receivers.
    pub fn new() -> Self {
        Self {
            tail: CachePadded::new(Mutex::new(Cell::pending())),
        }
    }

    /// Publishes `value` to every listening receiver.
    ///
    /// Never blocks on receivers; the only contention is with other
    /// concurrent `write`/`listen` calls on this broadcaster.
    pub fn write(&self, value: T) {
        let next = Cell::pending();
        let mut tail = self.tail.lock();
        let filled = tail.fill(Slot::Value {
            value,
            next: Arc::clone(&next),
        });
        debug_assert!(filled, "broadcaster tail was already filled");
        *tail = next;
    }

    /// Publishes every value produced by `values`, in order.
    ///
    /// Values from a concurrent producer may interleave between them.
    pub fn write_all<I: IntoIterator<Item = T>>(&self, values: I) {
        for value in values {
            self.write(value);
        }
    }

    /// Attaches a new receiver.
    ///
    /// The receiver observes every value written after the broadcaster's
    /// lock is acquired here, and none written before. A `write` racing with
    /// `listen` is observed if and only if it acquires the lock second.
    pub fn listen(&self) -> Receiver<T> {
        let tail = self.tail.lock();
        tracing::trace!("receiver attached");
        Receiver::at(Arc::clone(&tail))
    }
}

impl<T> Default for Broadcaster<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Broadcaster<T> {
    fn drop(&mut self) {
        let tail = self.tail.get_mut();
        if tail.fill(Slot::Closed) {
            tracing::debug!("broadcaster dropped; chain closed");
        }
    }
}
