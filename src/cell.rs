use crate::cancel::Cancel;
use crate::wait::WaitList;
use crossbeam_utils::sync::Parker;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// What a filled [`Cell`] holds.
pub(crate) enum Slot<T> {
    /// A published value and the cell that will hold the value after it.
    Value { value: T, next: Arc<Cell<T>> },

    /// The broadcaster was dropped; the chain ends here.
    Closed,
}

/// A single-assignment link in the broadcast chain.
///
/// A cell starts out *pending* and is filled exactly once, by the
/// broadcaster, with a [`Slot`]. After that it is immutable and is shared
/// without locking by every receiver whose cursor reaches it.
///
/// # Memory
///
/// A cell keeps every cell after it alive. A receiver that stops reading
/// therefore pins the whole suffix of the chain from its cursor to the
/// broadcaster's tail; that suffix is released once the receiver catches up
/// or is dropped.
pub(crate) struct Cell<T> {
    slot: OnceLock<Slot<T>>,
    waiters: WaitList,
}

impl<T> Cell<T> {
    pub(crate) fn pending() -> Arc<Self> {
        Arc::new(Self {
            slot: OnceLock::new(),
            waiters: WaitList::default(),
        })
    }

    /// Fills the cell and wakes every thread waiting on it.
    ///
    /// Never blocks on readers. Returns `false` (and drops `slot`) if the
    /// cell was already filled.
    pub(crate) fn fill(&self, slot: Slot<T>) -> bool {
        let filled = self.slot.set(slot).is_ok();
        if filled {
            self.waiters.notify_all();
        }
        filled
    }

    /// Non-blocking probe.
    #[inline]
    pub(crate) fn get(&self) -> Option<&Slot<T>> {
        self.slot.get()
    }

    /// Blocks until the cell is filled or `cancel` fires.
    ///
    /// `cancel` always takes priority: an already fired signal yields `None`
    /// even if the cell has been filled. `None` is returned only on
    /// cancellation.
    pub(crate) fn wait(&self, cancel: Option<&Cancel>) -> Option<&Slot<T>> {
        let cancelled = || cancel.is_some_and(Cancel::is_fired);

        if cancelled() {
            return None;
        }
        if let Some(slot) = self.slot.get() {
            return Some(slot);
        }

        let parker = Parker::new();
        let _filled = self.waiters.register(parker.unparker());
        let _fired = cancel.map(|c| c.register(parker.unparker()));

        loop {
            if cancelled() {
                return None;
            }
            if let Some(slot) = self.slot.get() {
                return Some(slot);
            }
            match cancel.and_then(Cancel::deadline) {
                Some(deadline) => {
                    parker.park_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => parker.park(),
            }
        }
    }

    fn take_next(&mut self) -> Option<Arc<Cell<T>>> {
        match self.slot.take() {
            Some(Slot::Value { next, .. }) => Some(next),
            _ => None,
        }
    }
}

// Neither impl follows `next`: printing a receiver that lags far behind
// would otherwise walk (and recurse through) the entire chain.
impl<T: Debug> Debug for Slot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Value { value, .. } => f
                .debug_struct("Value")
                .field("value", value)
                .finish_non_exhaustive(),
            Slot::Closed => f.write_str("Closed"),
        }
    }
}

impl<T> Debug for Cell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.slot.get() {
            None => "pending",
            Some(Slot::Value { .. }) => "filled",
            Some(Slot::Closed) => "closed",
        };
        f.debug_struct("Cell").field("state", &state).finish()
    }
}

impl<T> Drop for Cell<T> {
    /// Unlinks the chain iteratively.
    ///
    /// The naive drop recurses once per cell, which overflows the stack when
    /// a receiver that lagged by a few hundred thousand values is dropped.
    /// Here each uniquely owned successor is detached before it is dropped;
    /// the walk stops at the first cell someone else still references.
    fn drop(&mut self) {
        let mut next = self.take_next();
        while let Some(cell) = next {
            next = match Arc::into_inner(cell) {
                Some(mut cell) => cell.take_next(),
                None => None,
            };
        }
    }
}
