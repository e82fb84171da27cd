//! # tailcast
//!
//! A lossless multicast broadcaster: one side publishes a sequence of
//! values, and any number of receivers each observe the **entire** sequence
//! from the moment they subscribed, in order, at their own pace.
//!
//! - **No drops.** Every receiver gets every value written after it started
//!   listening.
//! - **No head-of-line blocking.** A slow receiver never delays the writer
//!   or any other receiver.
//! - **Total order.** Every receiver observes the same order, the order in
//!   which writes acquired the broadcaster's lock.
//!
//! ```
//! use tailcast::Broadcaster;
//!
//! let bc = Broadcaster::new();
//! let ra = bc.listen();
//! let rb = bc.listen();
//!
//! bc.write(1);
//! bc.write(2);
//!
//! assert_eq!(ra.read(), Ok(1));
//! assert_eq!(rb.read(), Ok(1));
//! assert_eq!(rb.read(), Ok(2));
//! assert_eq!(ra.read(), Ok(2));
//! ```
//!
//! ## Design
//!
//! Values are stored in an append-only chain of single-assignment cells.
//! The [`Broadcaster`] holds the chain's pending tail; each write fills the
//! tail with `(value, next)` and moves on to `next`. Each [`Receiver`] holds
//! its own cursor into the chain and walks it one cell at a time. Filled
//! cells are immutable and shared by all receivers without copying or
//! locking.
//!
//! ## Memory
//!
//! Please note that there is **no backpressure**. A receiver that stops
//! reading while the broadcaster keeps writing pins every value from its
//! cursor to the tail, and memory grows without bound until it catches up
//! or is dropped. This is the price of never dropping a value.
//!
//! ## Blocking and cancellation
//!
//! [`Receiver::read`] and [`Receiver::peek`] block until a value is
//! published. The `*_cancel` variants also return when a [`Cancel`] fires,
//! without consuming anything; a [`Cancel`] that had already fired wins
//! even if a value is available. Waiting threads are parked, not spun.
//!
//! ## Typed extraction
//!
//! [`Receiver::read_typed`] narrows the next value to a requested type via
//! the [`Narrow`] trait and leaves it in place when it does not match. See
//! the [`shape`] module.
//!
//! ## Modules
//!
//! - [`shape`]: the [`Narrow`] seam and the [`Value`] / [`Dynamic`]
//!   value models.
//! - [`utils`]: latency measurement helpers used by the bench binary.
//!
//! ## License
//!
//! Copyright © 2005–2025
//! IKH Software, Inc.
//!
//! Licensed under the terms of the **GNU Lesser General Public License**,
//! version 3.0, or (at your option) any later version.
//!
//! See <https://www.gnu.org/licenses/lgpl-3.0.html> for details.

mod broadcaster;
mod cancel;
mod cell;
mod chan;
mod error;
mod maybe;
mod receiver;
pub mod shape;
pub mod utils;
mod wait;

#[cfg(test)]
mod test_utils;

pub use broadcaster::{Broadcaster, broadcast};
pub use cancel::Cancel;
pub use chan::{ReadChanConfig, StopHandle};
pub use error::{Disconnected, ReadError, SpawnError, TryReadError};
pub use maybe::{Maybe, MaybeTyped};
pub use receiver::{Iter, Receiver};
pub use shape::{Dynamic, Narrow, Typed, Value};
pub use utils::{Latencies, mono_time_ns};
