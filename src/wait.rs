use crossbeam_utils::sync::Unparker;
use parking_lot::Mutex;

/// Threads parked on a one-shot transition.
///
/// Both a [`Cell`](crate::cell::Cell) becoming filled and a
/// [`Cancel`](crate::Cancel) firing are one-shot transitions that any number
/// of threads may be waiting on. A waiter registers its `Unparker` here,
/// re-checks the condition, and parks. The transitioning side publishes its
/// new state **before** calling [`WaitList::notify_all`], so a waiter that
/// registered too late to be notified is guaranteed to observe the new state
/// on its re-check.
#[derive(Debug, Default)]
pub(crate) struct WaitList {
    inner: Mutex<Entries>,
}

#[derive(Debug, Default)]
struct Entries {
    next_id: u64,
    parked: Vec<(u64, Unparker)>,
}

impl WaitList {
    /// Registers a waiter. The registration is removed when the returned
    /// guard is dropped.
    pub(crate) fn register(&self, unparker: &Unparker) -> Registration<'_> {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id = inner.next_id.wrapping_add(1);
        inner.parked.push((id, unparker.clone()));
        Registration { list: self, id }
    }

    /// Wakes and removes every registered waiter.
    pub(crate) fn notify_all(&self) {
        let parked = std::mem::take(&mut self.inner.lock().parked);
        for (_, unparker) in parked {
            unparker.unpark();
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().parked.len()
    }
}

/// Keeps a waiter registered in a [`WaitList`] until dropped.
#[derive(Debug)]
pub(crate) struct Registration<'a> {
    list: &'a WaitList,
    id: u64,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        let id = self.id;
        // A no-op when notify_all already drained the entry.
        self.list.inner.lock().parked.retain(|(i, _)| *i != id);
    }
}
