//! # hpyx
//!
//! **hpyx** runs blocking computations on a work-stealing thread pool and
//! lets a single-threaded cooperative event loop await their results
//! without blocking.
//!
//! Two schedulers cooperate:
//!
//! - the **dispatch runtime** ([`runtime`]): OS worker threads, a global
//!   injector, per-worker local queues and work stealing. Work submitted
//!   to it returns a [`PoolFuture`] that can be awaited, blocked on, or
//!   chained.
//! - the **event loop** ([`event_loop`]): one thread polling `!Send`
//!   tasks, with thread-safe callbacks, one-shot promises and task
//!   introspection.
//!
//! [`dispatch`] bridges the two: the closure runs on the pool and its
//! outcome is posted back to the loop as a callback.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::thread;
//! use std::time::Duration;
//!
//! #[hpyx::main]
//! async fn main() -> Result<(), hpyx::DispatchError> {
//!     let handle = hpyx::dispatch(|| {
//!         thread::sleep(Duration::from_millis(100));
//!         42
//!     })?;
//!
//!     // The loop stays responsive while the pool works.
//!     println!("Result = {}", handle.await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`runtime`]: the pool, its configuration and the global instance
//! - [`event_loop`]: the cooperative scheduler
//! - [`demo`]: the launch-two-await-one demonstration
//! - [`ops`]: sample operations
//! - [`time`]: timing helpers

mod config;
mod dispatch;
mod error;
mod utils;

pub mod demo;
pub mod event_loop;
pub mod ops;
pub mod runtime;
pub mod time;

pub use config::{BindPolicy, RuntimeConfig};
pub use dispatch::{Dispatched, dispatch, dispatch_on};
pub use error::{ConfigError, DispatchError, FutureError, LoopError, RuntimeError, TaskError};
pub use runtime::builder::RuntimeBuilder;
pub use runtime::yield_now::yield_now;
pub use runtime::{PoolFuture, Runtime, init_runtime, init_runtime_with, stop_runtime};

pub use hpyx_macros::*;
