use crate::cancel::Cancel;
use crate::error::{ReadError, SpawnError};
use crate::receiver::Receiver;
use crossbeam_channel::{Sender, select_biased};
use parking_lot::Mutex;
use std::ops::ControlFlow;
use std::thread::{self, JoinHandle};

/// Settings for [`Receiver::read_chan_with`].
///
/// ```
/// use tailcast::{Broadcaster, ReadChanConfig};
///
/// let bc = Broadcaster::<u64>::new();
/// let rx = bc.listen();
/// let config = ReadChanConfig::new().name("prices").capacity(64);
/// let (values, stop) = rx.read_chan_with(config).unwrap();
/// bc.write(1);
/// assert_eq!(values.recv(), Ok(1));
/// stop.stop();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReadChanConfig {
    name: Option<String>,
    stack_size: Option<usize>,
    capacity: usize,
}

impl ReadChanConfig {
    /// Default settings: a thread named `tailcast-read-chan` with the
    /// platform's default stack size, and a rendezvous (zero-capacity)
    /// output channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the adapter thread.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Stack size of the adapter thread, in bytes.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Capacity of the output channel.
    ///
    /// With the default of `0` every value is handed over directly to a
    /// waiting consumer, so nothing is delivered after [`StopHandle::stop`]
    /// returns. With a larger capacity up to that many values are read
    /// ahead, and values already buffered when `stop` is called are still
    /// delivered.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Stop control for a [`Receiver::read_chan`] adapter.
///
/// Dropping the handle stops the adapter, like calling [`StopHandle::stop`].
#[derive(Debug)]
#[must_use = "dropping the StopHandle stops the adapter immediately"]
pub struct StopHandle {
    cancel: Cancel,
    /// Dropped by `stop` to interrupt a handover blocked on a slow consumer.
    interrupt: Mutex<Option<Sender<()>>>,
    thread: Option<JoinHandle<()>>,
}

impl StopHandle {
    /// Stops the adapter.
    ///
    /// The output channel is closed once the adapter exits. Values not yet
    /// handed over stay at the receiver's cursor. Calling this again, or
    /// after the output has already closed, does nothing.
    pub fn stop(&self) {
        self.cancel.fire();
        self.interrupt.lock().take();
    }

    /// Returns `true` once the adapter thread has exited and the output
    /// channel is closed.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Waits for the adapter thread to exit.
    ///
    /// This does not stop the adapter; it returns once [`stop`](Self::stop)
    /// was called from elsewhere, the broadcaster was dropped, or the
    /// output channel's receiver was dropped and a value became available.
    pub fn join(mut self) -> thread::Result<()> {
        match self.thread.take() {
            Some(thread) => thread.join(),
            None => Ok(()),
        }
    }
}

impl Drop for StopHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Why the adapter loop ended.
#[derive(Debug, Clone, Copy)]
enum Exit {
    Stopped,
    Disconnected,
    OutputClosed,
}

impl<T: Clone + Send + Sync + 'static> Receiver<T> {
    /// Forwards this receiver's values into a channel on a dedicated thread.
    ///
    /// The adapter shares this receiver's cursor: values it forwards are
    /// consumed from this receiver. It runs until the returned
    /// [`StopHandle`] is stopped or dropped, the broadcaster is dropped and
    /// drained, or the output channel's receiver is dropped. The output
    /// channel is closed exactly once, when the adapter exits, on every exit
    /// path.
    ///
    /// The adapter holds this receiver's lock while it waits for the next
    /// value and while it hands it over, so other reads through this
    /// receiver queue behind it until it exits. Use [`Receiver::fork`] first
    /// for an adapter that runs alongside direct reads.
    ///
    /// ```
    /// use tailcast::Broadcaster;
    ///
    /// let bc = Broadcaster::new();
    /// let rx = bc.listen();
    /// for i in 0..4 {
    ///     bc.write(i);
    /// }
    ///
    /// let (values, stop) = rx.read_chan().unwrap();
    /// let mut seen = Vec::new();
    /// for v in &values {
    ///     seen.push(v);
    ///     if seen.len() == 4 {
    ///         stop.stop();
    ///     }
    /// }
    /// assert_eq!(seen, [0, 1, 2, 3]);
    /// ```
    pub fn read_chan(&self) -> Result<(crossbeam_channel::Receiver<T>, StopHandle), SpawnError> {
        self.read_chan_with(ReadChanConfig::default())
    }

    /// [`read_chan`](Self::read_chan) with explicit settings.
    pub fn read_chan_with(
        &self,
        config: ReadChanConfig,
    ) -> Result<(crossbeam_channel::Receiver<T>, StopHandle), SpawnError> {
        let (out, values) = crossbeam_channel::bounded(config.capacity);
        let (interrupt, interrupted) = crossbeam_channel::bounded::<()>(0);
        let cancel = Cancel::new();

        let source = self.shared();
        let stop = cancel.clone();
        let mut builder = thread::Builder::new().name(
            config
                .name
                .unwrap_or_else(|| String::from("tailcast-read-chan")),
        );
        if let Some(bytes) = config.stack_size {
            builder = builder.stack_size(bytes);
        }

        let thread = builder
            .spawn(move || {
                tracing::trace!("read_chan adapter started");
                // `out` is dropped when this closure returns or unwinds,
                // which closes the output channel.
                let exit = forward(&source, &stop, &out, &interrupted);
                tracing::debug!(?exit, "read_chan adapter exited");
            })
            .map_err(SpawnError)?;

        Ok((
            values,
            StopHandle {
                cancel,
                interrupt: Mutex::new(Some(interrupt)),
                thread: Some(thread),
            },
        ))
    }
}

fn forward<T: Clone>(
    source: &Receiver<T>,
    stop: &Cancel,
    out: &Sender<T>,
    interrupted: &crossbeam_channel::Receiver<()>,
) -> Exit {
    loop {
        let handover = source.read_cancel_with(stop, |value| {
            // A stop request wins over a consumer that is ready to receive.
            select_biased! {
                recv(interrupted) -> _ => ControlFlow::Break(Exit::Stopped),
                send(out, value.clone()) -> sent => match sent {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(_) => ControlFlow::Break(Exit::OutputClosed),
                },
            }
        });
        match handover {
            Ok(ControlFlow::Continue(())) => {}
            Ok(ControlFlow::Break(exit)) => return exit,
            Err(ReadError::Cancelled) => return Exit::Stopped,
            Err(ReadError::Disconnected(_)) => return Exit::Disconnected,
        }
    }
}
