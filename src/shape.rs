//! Typed extraction.
//!
//! The broadcast layer does not care what `T` is. Consumers that only want
//! values of a particular shape use the `*_typed` reads on
//! [`Receiver`](crate::Receiver), which try to [`Narrow`] the value at the
//! cursor into the requested type. A value that does not narrow is **not**
//! consumed: it stays at the cursor for any later read.
//!
//! Two value models are provided:
//!
//! - [`Value`], a tagged union where narrowing is a variant check, and
//! - [`Dynamic`], a type-erased `Arc<dyn Any>` where narrowing is a
//!   downcast.
//!
//! Any other `T` can opt in by implementing [`Narrow<T>`] for its target
//! types.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Attempts to view a published value as `Self`.
///
/// Implementations must be side-effect free: returning `None` leaves the
/// value at the receiver's cursor untouched.
pub trait Narrow<T>: Sized {
    fn narrow(value: &T) -> Option<Self>;
}

/// Outcome of a single typed read that found a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Typed<U, T> {
    /// The value narrowed to `U` and was consumed.
    Matched(U),

    /// The value did not narrow. It was **not** consumed; this is a copy of
    /// what is still at the cursor.
    Mismatched(T),
}

impl<U, T> Typed<U, T> {
    pub fn is_matched(&self) -> bool {
        matches!(self, Typed::Matched(_))
    }

    /// The narrowed value, discarding a mismatch.
    pub fn matched(self) -> Option<U> {
        match self {
            Typed::Matched(u) => Some(u),
            Typed::Mismatched(_) => None,
        }
    }
}

/// A dynamically shaped value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => f.write_str("()"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "{b:?}"),
        }
    }
}

macro_rules! value_shape {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }

        impl Narrow<Value> for $ty {
            fn narrow(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

value_shape!(Bool, bool);
value_shape!(Int, i64);
value_shape!(Float, f64);
value_shape!(Str, String);
value_shape!(Bytes, Vec<u8>);

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Unit
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl Narrow<Value> for () {
    fn narrow(value: &Value) -> Option<Self> {
        matches!(value, Value::Unit).then_some(())
    }
}

impl Narrow<Value> for Value {
    fn narrow(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// A type-erased value, narrowed by downcasting.
///
/// ```
/// use tailcast::{Broadcaster, Dynamic};
///
/// let bc = Broadcaster::new();
/// let rx = bc.listen();
/// bc.write(Dynamic::new(7u8));
/// bc.write(Dynamic::new("seven"));
///
/// assert_eq!(rx.must_read_typed::<&str>(), Ok("seven"));
/// ```
#[derive(Clone)]
pub struct Dynamic(Arc<dyn Any + Send + Sync>);

impl Dynamic {
    pub fn new<V: Any + Send + Sync>(value: V) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.0.downcast_ref()
    }

    pub fn is<V: Any>(&self) -> bool {
        self.0.is::<V>()
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dynamic").finish_non_exhaustive()
    }
}

impl<U: Any + Clone> Narrow<Dynamic> for U {
    fn narrow(value: &Dynamic) -> Option<Self> {
        value.downcast_ref::<U>().cloned()
    }
}
