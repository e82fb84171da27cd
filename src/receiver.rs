use crate::cancel::Cancel;
use crate::cell::{Cell, Slot};
use crate::error::{Disconnected, ReadError, TryReadError};
use crate::shape::{Narrow, Typed};
use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use std::iter::FusedIterator;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

/// The reading side of the broadcast chain.
///
/// A `Receiver`:
///
/// - never mutates the chain, only its own cursor,
/// - moves its cursor forward one cell at a time, never backwards and never
///   skipping a value, and
/// - is paced independently of the broadcaster and of every other receiver.
///
/// All methods take `&self`. Operations on one receiver are serialized by
/// its own lock: a blocked `read` holds it, so a concurrent `peek` on the
/// same receiver queues behind it. Operations on different receivers never
/// contend with each other.
///
/// # Reading protocol
///
/// Every read is a *peek-or-block* on the cell at the cursor, optionally
/// followed by an *advance* to the next cell. Reads that only inspect
/// ([`peek`](Self::peek), a mismatching [`read_typed`](Self::read_typed), a
/// cancelled [`read_cancel`](Self::read_cancel)) leave the cursor where it
/// is, so the same value is returned again by the next read.
///
/// # Cancellation priority
///
/// A [`Cancel`] that has already fired wins, even if a value is available.
///
/// # Memory
///
/// A receiver keeps every value from its cursor onwards alive. One that is
/// no longer read from should be dropped.
#[derive(Debug)]
pub struct Receiver<T> {
    cursor: Arc<CachePadded<Mutex<Arc<Cell<T>>>>>,
}

/// Result of peek-or-block: the value at the cursor and the cell after it.
fn peek_or_block<'c, T>(
    cell: &'c Cell<T>,
    cancel: Option<&Cancel>,
) -> Result<(&'c T, &'c Arc<Cell<T>>), ReadError> {
    match cell.wait(cancel) {
        None => Err(ReadError::Cancelled),
        Some(Slot::Closed) => Err(Disconnected.into()),
        Some(Slot::Value { value, next }) => Ok((value, next)),
    }
}

/// Without a cancel signal the only way a wait ends empty-handed is a
/// closed chain.
fn uncancellable<V>(result: Result<V, ReadError>) -> Result<V, Disconnected> {
    result.map_err(|err| {
        debug_assert!(err.is_disconnected());
        Disconnected
    })
}

impl<T> Receiver<T> {
    pub(crate) fn at(cell: Arc<Cell<T>>) -> Self {
        Self {
            cursor: Arc::new(CachePadded::new(Mutex::new(cell))),
        }
    }

    /// A handle sharing this receiver's cursor (used by the channel adapter).
    pub(crate) fn shared(&self) -> Self {
        Self {
            cursor: Arc::clone(&self.cursor),
        }
    }

    /// Creates an independent receiver positioned at this receiver's cursor.
    ///
    /// Both receivers will observe the same values from here on, each at its
    /// own pace.
    pub fn fork(&self) -> Self {
        let cursor = self.cursor.lock();
        Self::at(Arc::clone(&cursor))
    }

    /// Cancellable peek-or-block that hands the value to `deliver` while the
    /// lock is still held; the cursor advances only on `Continue`.
    pub(crate) fn read_cancel_with<B>(
        &self,
        cancel: &Cancel,
        deliver: impl FnOnce(&T) -> ControlFlow<B>,
    ) -> Result<ControlFlow<B>, ReadError> {
        let mut cursor = self.cursor.lock();
        let cell = Arc::clone(&cursor);
        let (value, next) = peek_or_block(&cell, Some(cancel))?;
        let flow = deliver(value);
        if flow.is_continue() {
            *cursor = Arc::clone(next);
        }
        Ok(flow)
    }

    /// Consumes values until one narrows to `U`.
    fn take_until<U: Narrow<T>>(&self, cancel: Option<&Cancel>) -> Result<U, ReadError> {
        let mut cursor = self.cursor.lock();
        loop {
            let cell = Arc::clone(&cursor);
            let (value, next) = peek_or_block(&cell, cancel)?;
            let narrowed = U::narrow(value);
            *cursor = Arc::clone(next);
            if let Some(u) = narrowed {
                return Ok(u);
            }
        }
    }

    /// Reads values until one narrows to `U`, and returns it.
    ///
    /// Every value read on the way, matching or not, is consumed.
    ///
    /// # Blocking
    ///
    /// This blocks for as long as it takes for a value of shape `U` to be
    /// published. If none ever is, it blocks until the broadcaster is
    /// dropped.
    pub fn must_read_typed<U: Narrow<T>>(&self) -> Result<U, Disconnected> {
        uncancellable(self.take_until(None))
    }

    /// Like [`must_read_typed`](Self::must_read_typed), but gives up with
    /// [`ReadError::Cancelled`] as soon as `cancel` fires while waiting for
    /// the next value.
    ///
    /// Values consumed before the cancellation stay consumed.
    pub fn must_read_typed_cancel<U: Narrow<T>>(&self, cancel: &Cancel) -> Result<U, ReadError> {
        self.take_until(Some(cancel))
    }
}

impl<T: Clone> Receiver<T> {
    fn take(&self, cancel: Option<&Cancel>, advance: bool) -> Result<T, ReadError> {
        let mut cursor = self.cursor.lock();
        let cell = Arc::clone(&cursor);
        let (value, next) = peek_or_block(&cell, cancel)?;
        if advance {
            *cursor = Arc::clone(next);
        }
        Ok(value.clone())
    }

    fn try_take(&self, advance: bool) -> Result<T, TryReadError> {
        let mut cursor = self.cursor.lock();
        let (value, next) = match cursor.get() {
            None => return Err(TryReadError::Empty),
            Some(Slot::Closed) => return Err(Disconnected.into()),
            Some(Slot::Value { value, next }) => (value.clone(), Arc::clone(next)),
        };
        if advance {
            *cursor = next;
        }
        Ok(value)
    }

    fn take_typed<U: Narrow<T>>(&self, cancel: Option<&Cancel>) -> Result<Typed<U, T>, ReadError> {
        let mut cursor = self.cursor.lock();
        let cell = Arc::clone(&cursor);
        let (value, next) = peek_or_block(&cell, cancel)?;
        match U::narrow(value) {
            Some(u) => {
                *cursor = Arc::clone(next);
                Ok(Typed::Matched(u))
            }
            None => Ok(Typed::Mismatched(value.clone())),
        }
    }

    /// Blocking read.
    ///
    /// Waits until a value is published at the cursor, returns it and
    /// advances to the next one.
    pub fn read(&self) -> Result<T, Disconnected> {
        uncancellable(self.take(None, true))
    }

    /// Blocking peek.
    ///
    /// Like [`read`](Self::read) but does not advance: the next read or peek
    /// returns the same value again.
    pub fn peek(&self) -> Result<T, Disconnected> {
        uncancellable(self.take(None, false))
    }

    /// Cancellable read.
    ///
    /// Returns [`ReadError::Cancelled`] if `cancel` fires (or had already
    /// fired) before a value is available. A cancelled read consumes
    /// nothing.
    pub fn read_cancel(&self, cancel: &Cancel) -> Result<T, ReadError> {
        self.take(Some(cancel), true)
    }

    /// Cancellable peek. Never advances.
    pub fn peek_cancel(&self, cancel: &Cancel) -> Result<T, ReadError> {
        self.take(Some(cancel), false)
    }

    /// [`read_cancel`](Self::read_cancel) with a signal that fires after
    /// `timeout`.
    pub fn read_timeout(&self, timeout: Duration) -> Result<T, ReadError> {
        self.read_cancel(&Cancel::after(timeout))
    }

    /// [`peek_cancel`](Self::peek_cancel) with a signal that fires after
    /// `timeout`.
    pub fn peek_timeout(&self, timeout: Duration) -> Result<T, ReadError> {
        self.peek_cancel(&Cancel::after(timeout))
    }

    /// Non-blocking read.
    ///
    /// Returns [`TryReadError::Empty`] if nothing has been published at the
    /// cursor yet.
    pub fn try_read(&self) -> Result<T, TryReadError> {
        self.try_take(true)
    }

    /// Non-blocking peek.
    pub fn try_peek(&self) -> Result<T, TryReadError> {
        self.try_take(false)
    }

    /// Typed read.
    ///
    /// Waits for the next value and tries to narrow it to `U`. On a match
    /// the value is consumed. On a mismatch it is **not**: the cursor stays
    /// put and the value is returned in [`Typed::Mismatched`] so that it
    /// remains visible to any later read.
    ///
    /// ```
    /// use tailcast::{Broadcaster, Typed, Value};
    ///
    /// let bc = Broadcaster::new();
    /// let rx = bc.listen();
    /// bc.write(Value::from("hello"));
    ///
    /// assert!(!rx.read_typed::<i64>().unwrap().is_matched());
    /// assert_eq!(rx.read_typed::<String>(), Ok(Typed::Matched("hello".to_owned())));
    /// ```
    pub fn read_typed<U: Narrow<T>>(&self) -> Result<Typed<U, T>, Disconnected> {
        uncancellable(self.take_typed(None))
    }

    /// Typed read with a cancellable wait.
    pub fn read_typed_cancel<U: Narrow<T>>(
        &self,
        cancel: &Cancel,
    ) -> Result<Typed<U, T>, ReadError> {
        self.take_typed(Some(cancel))
    }

    /// [`read_typed_cancel`](Self::read_typed_cancel) with a signal that
    /// fires after `timeout`.
    pub fn read_typed_timeout<U: Narrow<T>>(
        &self,
        timeout: Duration,
    ) -> Result<Typed<U, T>, ReadError> {
        self.read_typed_cancel(&Cancel::after(timeout))
    }

    /// Blocking iterator over values; ends when the broadcaster is dropped
    /// and everything published before that has been read.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { receiver: self }
    }
}

/// Iterator returned by [`Receiver::iter`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    receiver: &'a Receiver<T>,
}

impl<T: Clone> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.receiver.read().ok()
    }
}

// A closed cell is never advanced past, so once `read` reports
// `Disconnected` it keeps doing so.
impl<T: Clone> FusedIterator for Iter<'_, T> {}

/// Same as [`Receiver::fork`]: the clone gets its own cursor.
impl<T> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        self.fork()
    }
}

impl<'a, T: Clone> IntoIterator for &'a Receiver<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcaster::{Broadcaster, broadcast};
    use crate::shape::Value;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn read_returns_values_in_write_order() {
        let (bc, rx) = broadcast();
        bc.write(Value::from("hello"));
        bc.write(Value::from(1));
        bc.write(Value::from("world"));

        assert_eq!(rx.read(), Ok(Value::from("hello")));
        assert_eq!(rx.read(), Ok(Value::from(1)));
        assert_eq!(rx.read(), Ok(Value::from("world")));
    }

    #[test]
    fn peek_then_read_returns_the_same_value() {
        let (bc, rx) = broadcast();
        bc.write(10);
        bc.write(20);

        assert_eq!(rx.peek(), Ok(10));
        assert_eq!(rx.peek(), Ok(10));
        assert_eq!(rx.read(), Ok(10));
        assert_eq!(rx.peek(), Ok(20));
        assert_eq!(rx.read(), Ok(20));
        assert_eq!(rx.try_peek(), Err(TryReadError::Empty));
    }

    #[test]
    fn try_read_and_read_interleave() {
        let (bc, rx) = broadcast();
        assert_eq!(rx.try_read(), Err(TryReadError::Empty));

        bc.write(111);
        bc.write(222);
        assert_eq!(rx.read(), Ok(111));
        assert_eq!(rx.try_read(), Ok(222));
        assert_eq!(rx.try_read(), Err(TryReadError::Empty));

        drop(bc);
        assert_eq!(rx.try_read(), Err(TryReadError::Disconnected(Disconnected)));
    }

    #[test]
    fn timed_out_read_leaves_value_for_a_later_read() {
        let bc = Arc::new(Broadcaster::new());
        let rx = bc.listen();
        let released = Arc::new(Barrier::new(2));

        let writer = {
            let bc = Arc::clone(&bc);
            let released = Arc::clone(&released);
            thread::spawn(move || {
                released.wait();
                bc.write(5u64);
            })
        };

        // Both attempts give up while the writer is still held back.
        assert_eq!(
            rx.read_timeout(Duration::from_millis(5)),
            Err(ReadError::Cancelled)
        );
        let cancel = Cancel::new();
        let firer = {
            let cancel = cancel.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                cancel.fire();
            })
        };
        assert_eq!(rx.read_cancel(&cancel), Err(ReadError::Cancelled));
        firer.join().unwrap();

        released.wait();
        // The value is not lost: an uncancellable read picks it up.
        assert_eq!(rx.read(), Ok(5));
        writer.join().unwrap();
    }

    #[test]
    fn fired_cancel_wins_even_when_value_is_ready() {
        let (bc, rx) = broadcast();
        bc.write(Value::from(1));

        let cancel = Cancel::fired();
        assert_eq!(rx.read_cancel(&cancel), Err(ReadError::Cancelled));
        assert_eq!(rx.peek_cancel(&cancel), Err(ReadError::Cancelled));
        assert!(rx.read_typed_cancel::<i64>(&cancel).unwrap_err().is_cancelled());
        assert_eq!(rx.must_read_typed_cancel::<i64>(&cancel), Err(ReadError::Cancelled));

        assert_eq!(rx.read(), Ok(Value::from(1)));
    }

    #[test]
    fn read_cancel_advances_only_when_found() {
        let (bc, rx) = broadcast();
        bc.write_all(0..5);

        let stop = Cancel::new();
        let mut seen = Vec::new();
        while let Ok(v) = rx.read_cancel(&stop) {
            seen.push(v);
            if seen.len() >= 3 {
                stop.fire();
            }
        }
        assert_eq!(seen, [0, 1, 2]);
        assert_eq!(rx.read(), Ok(3));
    }

    #[test]
    fn peek_cancel_never_advances() {
        let (bc, rx) = broadcast();
        bc.write('a');
        let cancel = Cancel::new();
        assert_eq!(rx.peek_cancel(&cancel), Ok('a'));
        assert_eq!(rx.peek_cancel(&cancel), Ok('a'));
        assert_eq!(rx.peek_timeout(Duration::from_millis(100)), Ok('a'));
        assert_eq!(rx.read(), Ok('a'));
        assert_eq!(
            rx.peek_timeout(Duration::from_millis(1)),
            Err(ReadError::Cancelled)
        );
    }

    #[test]
    fn cancel_from_another_thread_releases_blocked_read() {
        let (_bc, rx) = broadcast::<u64>();
        let cancel = Cancel::new();
        let firer = {
            let cancel = cancel.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                cancel.fire();
            })
        };
        let start = Instant::now();
        assert_eq!(rx.read_cancel(&cancel), Err(ReadError::Cancelled));
        assert!(start.elapsed() >= Duration::from_millis(20));
        firer.join().unwrap();
    }

    #[test]
    fn one_cancel_releases_every_waiting_receiver() {
        let bc = Broadcaster::<u64>::new();
        let cancel = Cancel::new();

        thread::scope(|s| {
            let waiters: Vec<_> = (0..4)
                .map(|_| {
                    let rx = bc.listen();
                    let cancel = cancel.clone();
                    s.spawn(move || rx.read_cancel(&cancel))
                })
                .collect();
            thread::sleep(Duration::from_millis(20));
            cancel.fire();
            for w in waiters {
                assert_eq!(w.join().unwrap(), Err(ReadError::Cancelled));
            }
        });
    }

    #[test]
    fn read_typed_leaves_mismatches_at_the_cursor() {
        let (bc, rx) = broadcast();
        bc.write(Value::from("hello"));
        bc.write(Value::from(1));
        bc.write(Value::from("world"));

        assert_eq!(rx.read_typed::<String>(), Ok(Typed::Matched("hello".into())));
        assert_eq!(rx.read_typed::<String>(), Ok(Typed::Mismatched(Value::from(1))));
        assert_eq!(rx.read_typed::<i64>(), Ok(Typed::Matched(1)));
        assert_eq!(
            rx.read_typed::<i64>(),
            Ok(Typed::Mismatched(Value::from("world")))
        );
        assert_eq!(rx.read_typed::<String>(), Ok(Typed::Matched("world".into())));
    }

    #[test]
    fn alternating_typed_reads_pick_out_each_shape() {
        let (bc, rx) = broadcast();
        bc.write(Value::from(1));
        bc.write(Value::from("a"));
        bc.write(Value::from(2));

        drop(bc);

        let mut strings = Vec::new();
        let mut ints = Vec::new();
        loop {
            match rx.read_typed::<String>() {
                Ok(Typed::Matched(s)) => strings.push(s),
                Ok(Typed::Mismatched(_)) => {}
                Err(Disconnected) => break,
            }
            match rx.read_typed::<i64>() {
                Ok(Typed::Matched(n)) => ints.push(n),
                Ok(Typed::Mismatched(_)) => {}
                Err(Disconnected) => break,
            }
        }
        assert_eq!(strings, ["a"]);
        assert_eq!(ints, [1, 2]);
    }

    #[test]
    fn mismatch_is_still_visible_to_plain_reads() {
        let (bc, rx) = broadcast();
        bc.write(Value::from(true));
        assert!(!rx.read_typed::<i64>().unwrap().is_matched());
        assert_eq!(rx.peek(), Ok(Value::from(true)));
        assert_eq!(rx.read(), Ok(Value::from(true)));
    }

    #[test]
    fn read_typed_loop_stops_at_first_mismatch() {
        let (bc, rx) = broadcast();
        for i in 0..4 {
            bc.write(Value::from(i));
        }
        bc.write(Value::from("done"));

        let mut ints = Vec::new();
        while let Ok(Typed::Matched(n)) = rx.read_typed::<i64>() {
            ints.push(n);
        }
        assert_eq!(ints, [0, 1, 2, 3]);
        assert_eq!(rx.read_typed::<String>().unwrap().matched().as_deref(), Some("done"));
    }

    #[test]
    fn read_typed_timeout_distinguishes_cancelled_from_mismatched() {
        let (bc, rx) = broadcast();
        assert_eq!(
            rx.read_typed_timeout::<i64>(Duration::from_millis(5)),
            Err(ReadError::Cancelled)
        );
        bc.write(Value::Unit);
        assert_eq!(
            rx.read_typed_timeout::<i64>(Duration::from_millis(5)),
            Ok(Typed::Mismatched(Value::Unit))
        );
        assert_eq!(
            rx.read_typed_timeout::<()>(Duration::from_millis(5)),
            Ok(Typed::Matched(()))
        );
    }

    #[test]
    fn must_read_typed_consumes_mismatches() {
        let (bc, rx) = broadcast();
        bc.write(Value::from("hello"));
        bc.write(Value::from(1));
        bc.write(Value::from("world"));

        assert_eq!(rx.must_read_typed::<String>(), Ok("hello".to_owned()));
        assert_eq!(rx.must_read_typed::<String>(), Ok("world".to_owned()));
        assert_eq!(rx.try_read(), Err(TryReadError::Empty));
    }

    #[test]
    fn must_read_typed_blocks_until_shape_arrives() {
        let bc = Arc::new(Broadcaster::new());
        let rx = bc.listen();
        let writer = {
            let bc = Arc::clone(&bc);
            thread::spawn(move || {
                bc.write(Value::from(1));
                thread::sleep(Duration::from_millis(10));
                bc.write(Value::from(2));
                thread::sleep(Duration::from_millis(10));
                bc.write(Value::from("late"));
            })
        };
        assert_eq!(rx.must_read_typed::<String>(), Ok("late".to_owned()));
        writer.join().unwrap();
    }

    #[test]
    fn must_read_typed_reports_disconnect() {
        let (bc, rx) = broadcast();
        bc.write(Value::from(1));
        drop(bc);
        assert_eq!(rx.must_read_typed::<String>(), Err(Disconnected));
    }

    #[test]
    fn must_read_typed_cancel_stops_when_signalled() {
        let (bc, rx) = broadcast();
        bc.write_all([
            Value::from("hello"),
            Value::from(1),
            Value::from("cruel"),
            Value::from(2),
            Value::from("world"),
            Value::from(true),
            Value::from("jk"),
        ]);

        let stop = Cancel::new();
        let mut seen = Vec::new();
        while let Ok(s) = rx.must_read_typed_cancel::<String>(&stop) {
            seen.push(s);
            if seen.len() > 2 {
                stop.fire();
            }
        }
        assert_eq!(seen, ["hello", "cruel", "world"]);
        // Nothing past "world" was consumed by the cancelled call.
        assert_eq!(rx.read(), Ok(Value::from(true)));
    }

    #[test]
    fn must_read_typed_cancel_keeps_consumed_values_consumed() {
        let (bc, rx) = broadcast();
        bc.write(Value::from(1));
        bc.write(Value::from(2));

        let result = rx.must_read_typed_cancel::<String>(&Cancel::after(Duration::from_millis(10)));
        assert_eq!(result, Err(ReadError::Cancelled));
        assert_eq!(rx.try_read(), Err(TryReadError::Empty));
    }

    #[test]
    fn receivers_are_paced_independently() {
        const N: u64 = 2_000;
        let bc = Broadcaster::new();
        let fast = bc.listen();
        let slow = bc.listen();

        thread::scope(|s| {
            let fast = s.spawn(move || fast.iter().take(N as usize).collect::<Vec<_>>());
            let slow = s.spawn(move || {
                let mut out = Vec::new();
                for v in slow.iter().take(N as usize) {
                    if v % 200 == 0 {
                        thread::sleep(Duration::from_millis(1));
                    }
                    out.push(v);
                }
                out
            });
            bc.write_all(0..N);
            assert_eq!(fast.join().unwrap(), (0..N).collect::<Vec<_>>());
            assert_eq!(slow.join().unwrap(), (0..N).collect::<Vec<_>>());
        });
    }

    #[test]
    fn stalled_receiver_does_not_block_others() {
        let bc = Broadcaster::new();
        let _stalled = bc.listen();
        let active = bc.listen();
        for i in 0..1_000 {
            bc.write(i);
            assert_eq!(active.read(), Ok(i));
        }
    }

    #[test]
    fn fork_gets_an_independent_cursor() {
        let (bc, rx) = broadcast();
        bc.write(1);
        let fork = rx.fork();
        bc.write(2);

        assert_eq!(rx.read(), Ok(1));
        assert_eq!(rx.read(), Ok(2));
        assert_eq!(fork.read(), Ok(1));
        assert_eq!(fork.read(), Ok(2));
    }

    #[test]
    fn clone_gets_an_independent_cursor() {
        let (bc, rx) = broadcast();
        bc.write_all([1, 2]);
        assert_eq!(rx.read(), Ok(1));

        let clone = rx.clone();
        assert_eq!(clone.read(), Ok(2));
        assert_eq!(rx.read(), Ok(2), "clone must not advance the original");
        assert_eq!(clone.try_read(), Err(TryReadError::Empty));
    }

    #[test]
    fn shared_handles_share_the_cursor() {
        let (bc, rx) = broadcast();
        bc.write_all([1, 2]);
        let shared = rx.shared();
        assert_eq!(shared.read(), Ok(1));
        assert_eq!(rx.read(), Ok(2));
    }

    #[test]
    fn concurrent_reads_on_one_receiver_split_the_sequence() {
        const N: u64 = 4_000;
        let bc = Broadcaster::new();
        let rx = bc.listen();
        bc.write_all(0..N);
        drop(bc);

        let mut all: Vec<u64> = thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| rx.iter().collect::<Vec<_>>())).collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });
        all.sort_unstable();
        assert_eq!(all, (0..N).collect::<Vec<_>>(), "each value read exactly once");
    }

    #[test]
    fn dropping_a_lagging_receiver_releases_its_backlog() {
        let bc = Broadcaster::new();
        let lagging = bc.listen();
        for i in 0..300_000u64 {
            bc.write(i);
        }
        drop(lagging);
        bc.write(0);
    }

    #[test]
    fn for_loop_over_receiver_reference() {
        let (bc, rx) = broadcast();
        bc.write_all(["a", "b"]);
        drop(bc);
        let mut out = String::new();
        for s in &rx {
            out.push_str(s);
        }
        assert_eq!(out, "ab");
    }
}
