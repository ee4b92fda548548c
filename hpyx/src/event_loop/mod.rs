//! The cooperative event loop.
//!
//! A single-threaded scheduler in the spirit of asyncio: one thread polls
//! every task, tasks yield at `.await` points, and other threads reach
//! the loop only through thread-safe callbacks and promises.
//!
//! It provides:
//! - [`EventLoop::run`] / [`run`] to drive a top-level future,
//! - [`spawn_local`] and [`spawn_named`] for `!Send` tasks,
//! - [`all_tasks`] and [`current_task`] for introspection,
//! - [`LoopHandle`] for [`call_soon_threadsafe`](LoopHandle::call_soon_threadsafe)
//!   and [`create_future`](LoopHandle::create_future).

mod context;
mod core;
mod future;
mod handle;
mod task;
mod waker;

pub use self::core::EventLoop;
pub use context::get_running_loop;
pub use future::{LoopFuture, Promise};
pub use handle::LoopHandle;
pub use task::{LocalJoinHandle, TaskInfo, all_tasks, current_task, spawn_local, spawn_named};

use std::future::Future;

/// Runs `future` to completion on a fresh [`EventLoop`] bound to the
/// current thread.
///
/// # Examples
///
/// ```rust
/// let answer = hpyx::event_loop::run(async { 42 });
/// assert_eq!(answer, 42);
/// ```
pub fn run<F: Future>(future: F) -> F::Output {
    EventLoop::new().run(future)
}
