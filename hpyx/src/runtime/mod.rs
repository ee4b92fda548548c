//! The dispatch runtime.
//!
//! A pool of OS worker threads that executes submitted work with a
//! work-stealing scheduler. It is the "external execution facility" the
//! event loop hands blocking computations to.
//!
//! It is responsible for:
//! - executing async tasks and blocking closures,
//! - balancing work between workers (injector + local queues + stealing),
//! - optional pinning of workers to cores,
//! - the process-wide runtime managed by [`init_runtime`] / [`stop_runtime`].

mod affinity;
mod core;
mod executor;
mod work_stealing;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod global;
pub(crate) mod yield_now;

pub mod task;

pub use self::core::Runtime;
pub use context::is_worker_thread;
pub use global::{handle, init_runtime, init_runtime_with, is_running, stop_runtime};
pub use task::{PoolFuture, spawn, when_all};
