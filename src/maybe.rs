use crate::error::ReadError;
use crate::shape::Typed;
use std::fmt;

/// Human-readable view of a read that may not have produced a value.
///
/// Displays as `nothing` or `just <value>`.
///
/// ```
/// use tailcast::{Broadcaster, Cancel, Maybe};
///
/// let bc = Broadcaster::new();
/// let rx = bc.listen();
/// bc.write(1);
///
/// let cancel = Cancel::new();
/// assert_eq!(Maybe::from(rx.read_cancel(&cancel)).to_string(), "just 1");
/// cancel.fire();
/// assert_eq!(Maybe::from(rx.read_cancel(&cancel)).to_string(), "nothing");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Maybe<T>(pub Option<T>);

impl<T> Maybe<T> {
    pub fn exists(&self) -> bool {
        self.0.is_some()
    }

    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T, E> From<Result<T, E>> for Maybe<T> {
    fn from(result: Result<T, E>) -> Self {
        Self(result.ok())
    }
}

impl<T: fmt::Display> fmt::Display for Maybe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(v) => write!(f, "just {v}"),
            None => f.write_str("nothing"),
        }
    }
}

/// Human-readable view of a typed read.
///
/// Keeps apart the two ways a typed read can come back without a `U`: no
/// value was found (the wait was cancelled or the broadcaster is gone), or
/// a value was found but did not narrow.
///
/// Displays as `invalid` unless a value was both found and matched, in
/// which case it displays like [`Maybe`].
///
/// ```
/// use tailcast::{Broadcaster, Cancel, MaybeTyped, Value};
///
/// let bc = Broadcaster::new();
/// let rx = bc.listen();
/// bc.write(Value::from("a"));
///
/// let m = MaybeTyped::from(rx.read_typed_cancel::<i64>(&Cancel::new()));
/// assert!(m.is_found());
/// assert!(!m.is_valid());
/// assert_eq!(m.to_string(), "invalid");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MaybeTyped<U> {
    value: Maybe<U>,
    found: bool,
    valid: bool,
}

impl<U> MaybeTyped<U> {
    /// `true` if a value was found and narrowed to `U`.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// `true` if a value was found at the cursor, whether or not it matched.
    pub fn is_found(&self) -> bool {
        self.found
    }

    /// The narrowed value; present only when [`is_valid`](Self::is_valid).
    pub fn value(&self) -> &Maybe<U> {
        &self.value
    }
}

/// Accepts both the cancellable (`ReadError`) and the blocking
/// (`Disconnected`) typed reads.
impl<U, T, E: Into<ReadError>> From<Result<Typed<U, T>, E>> for MaybeTyped<U> {
    fn from(result: Result<Typed<U, T>, E>) -> Self {
        match result {
            Ok(Typed::Matched(u)) => Self {
                value: Maybe(Some(u)),
                found: true,
                valid: true,
            },
            Ok(Typed::Mismatched(_)) => Self {
                value: Maybe(None),
                found: true,
                valid: false,
            },
            Err(_) => Self {
                value: Maybe(None),
                found: false,
                valid: false,
            },
        }
    }
}

impl<U: fmt::Display> fmt::Display for MaybeTyped<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return f.write_str("invalid");
        }
        self.value.fmt(f)
    }
}
