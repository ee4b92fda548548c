//! Pool task primitives.
//!
//! - task state management,
//! - wakers that reschedule tasks on the pool,
//! - [`PoolFuture`] handles for observing a task's outcome,
//! - the erased [`Runnable`] interface the queues store.

pub(crate) mod handle;
pub(crate) mod state;
pub(crate) mod waker;

pub(crate) use self::core::{Runnable, Task};

pub mod core;

pub use self::core::spawn;
pub use handle::{PoolFuture, when_all};
