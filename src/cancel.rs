use crate::wait::{Registration, WaitList};
use crossbeam_utils::sync::Unparker;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A one-shot, broadcastable "stop waiting" signal.
///
/// `Cancel` is a cheap handle; clones refer to the same signal. Firing it
/// releases every operation currently waiting on it (on any thread) and
/// every later operation handed the same signal. Firing twice is harmless.
///
/// A signal may also carry a deadline ([`Cancel::after`], [`Cancel::at`]),
/// in which case it counts as fired once the deadline has passed, whether
/// or not [`Cancel::fire`] was called.
///
/// ```
/// use std::time::Duration;
/// use tailcast::{Broadcaster, Cancel, ReadError};
///
/// let bc = Broadcaster::<u32>::new();
/// let rx = bc.listen();
///
/// // Nothing has been written, so the read gives up after 10ms.
/// let result = rx.read_cancel(&Cancel::after(Duration::from_millis(10)));
/// assert_eq!(result, Err(ReadError::Cancelled));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cancel {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    fired: AtomicBool,
    deadline: Option<Instant>,
    waiters: WaitList,
}

impl Cancel {
    /// A signal that fires only when [`Cancel::fire`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal that is already fired.
    ///
    /// Cancellable reads handed this signal return
    /// [`ReadError::Cancelled`](crate::ReadError::Cancelled) even when a
    /// value is available.
    pub fn fired() -> Self {
        let cancel = Self::new();
        cancel.inner.fired.store(true, Ordering::Release);
        cancel
    }

    /// A signal that fires once `timeout` has elapsed from now.
    pub fn after(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::at(deadline),
            // Too far in the future to represent: behaves as "never".
            None => Self::new(),
        }
    }

    /// A signal that fires at `deadline`.
    pub fn at(deadline: Instant) -> Self {
        Self {
            inner: Arc::new(Inner {
                deadline: Some(deadline),
                ..Inner::default()
            }),
        }
    }

    /// Fires the signal, releasing every operation waiting on it.
    pub fn fire(&self) {
        if !self.inner.fired.swap(true, Ordering::AcqRel) {
            self.inner.waiters.notify_all();
        }
    }

    /// Returns `true` once the signal has fired or its deadline has passed.
    pub fn is_fired(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
            || self.inner.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// The deadline this signal was created with, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    pub(crate) fn register(&self, unparker: &Unparker) -> Registration<'_> {
        self.inner.waiters.register(unparker)
    }
}
