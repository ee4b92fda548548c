use super::executor::core::Executor;
use crate::config::RuntimeConfig;
use crate::error::{RuntimeError, TaskError};
use crate::runtime::context::is_worker_thread;
use crate::runtime::task::PoolFuture;

use std::fmt;
use std::future::Future;

/// The dispatch runtime: a pool of worker threads executing submitted work.
///
/// `Runtime` is responsible for:
/// - accepting async work ([`spawn`](Self::spawn)) and blocking closures
///   ([`submit`](Self::submit)),
/// - chaining continuations ([`then`](Self::then)),
/// - providing a synchronous entry point ([`block_on`](Self::block_on)),
/// - an orderly shutdown that drains queued work before joining workers.
///
/// Dropping the runtime shuts it down.
pub struct Runtime {
    executor: Executor,

    config: RuntimeConfig,
}

impl Runtime {
    /// Starts a runtime with the given configuration.
    pub fn new(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        let executor = Executor::new(&config)?;

        tracing::debug!(
            os_threads = config.os_threads,
            bind = ?config.bind,
            "runtime started"
        );

        Ok(Self { executor, config })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.executor.workers()
    }

    /// Schedules a future on the pool.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let answer = runtime.spawn(async { 6 * 7 });
    /// assert_eq!(answer.get(), Ok(42));
    /// ```
    pub fn spawn<F, T>(&self, future: F) -> PoolFuture<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.executor.spawn(future)
    }

    /// Schedules a blocking, zero-argument computation on the pool.
    ///
    /// The closure runs on a worker thread and occupies it until it
    /// returns. A panic inside `f` resolves the handle to
    /// [`TaskError::Panicked`].
    pub fn submit<F, T>(&self, f: F) -> PoolFuture<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.spawn(async move { f() })
    }

    /// Schedules `f` to run on the pool with the outcome of `future`.
    ///
    /// The continuation runs on this runtime, whichever runtime `future`
    /// came from. Once shutdown has begun it resolves to
    /// [`TaskError::Abandoned`] without running.
    pub fn then<T, U, F>(&self, future: PoolFuture<T>, f: F) -> PoolFuture<U>
    where
        T: Send + 'static,
        U: Send + 'static,
        F: FnOnce(Result<T, TaskError>) -> U + Send + 'static,
    {
        self.spawn(async move { f(future.await) })
    }

    /// Runs a future on the pool and blocks the current thread until it
    /// completes.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async { 42 });
    /// assert_eq!(result, Ok(42));
    /// ```
    pub fn block_on<F>(&self, future: F) -> Result<F::Output, TaskError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.spawn(future).get()
    }

    /// Stops accepting work, lets workers drain the queues, and joins them.
    ///
    /// Idempotent. When called from one of this runtime's own workers the
    /// join is skipped (it would wait on itself); the workers still exit
    /// once idle.
    pub fn shutdown(&self) {
        if self.executor.is_shutdown() && self.executor.is_joined() {
            return;
        }

        self.executor.shutdown();

        if is_worker_thread() {
            return;
        }

        self.executor.join();
        tracing::debug!("runtime stopped");
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("workers", &self.workers())
            .field("shutdown", &self.executor.is_shutdown())
            .finish()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
