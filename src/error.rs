use thiserror::Error;

/// The [`Broadcaster`](crate::Broadcaster) was dropped and the receiver has
/// consumed everything that was published before the drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("broadcaster dropped; no further values will be published")]
pub struct Disconnected;

/// Why a cancellable read returned without a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The cancellation signal fired before a value was available.
    ///
    /// Nothing was consumed; the pending value (if any) is still at the
    /// receiver's cursor.
    #[error("wait cancelled before a value was available")]
    Cancelled,

    #[error(transparent)]
    Disconnected(#[from] Disconnected),
}

impl ReadError {
    /// Returns `true` for [`ReadError::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ReadError::Cancelled)
    }

    /// Returns `true` for [`ReadError::Disconnected`].
    pub fn is_disconnected(&self) -> bool {
        matches!(self, ReadError::Disconnected(_))
    }
}

/// Why a non-blocking read returned without a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryReadError {
    /// Nothing has been published at the receiver's cursor yet.
    #[error("no value published yet")]
    Empty,

    #[error(transparent)]
    Disconnected(#[from] Disconnected),
}

/// The channel adapter thread could not be started.
#[derive(Debug, Error)]
#[error("failed to spawn read_chan thread")]
pub struct SpawnError(#[source] pub std::io::Error);
