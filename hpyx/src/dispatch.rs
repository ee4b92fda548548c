//! Handing blocking work from the event loop to the dispatch runtime.
//!
//! [`dispatch`] submits a closure to the pool and returns immediately with
//! a [`Dispatched`] handle bound to the running loop. When the closure
//! finishes, a pool continuation posts the outcome back to the loop with
//! [`call_soon_threadsafe`](crate::event_loop::LoopHandle::call_soon_threadsafe),
//! which completes the handle on the loop thread.

use crate::error::{DispatchError, LoopError, TaskError};
use crate::event_loop::{LoopFuture, LoopHandle, get_running_loop};
use crate::runtime::Runtime;
use crate::runtime::global::global_or_init;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Handle to a computation started with [`dispatch`].
///
/// Resolves to the closure's return value, or to the failure that kept it
/// from producing one. Dropping the handle does not stop the computation.
#[must_use = "dropping a Dispatched handle discards the result, the work still runs"]
pub struct Dispatched<T> {
    inner: LoopFuture<Result<T, TaskError>>,
}

impl<T> Dispatched<T> {
    /// `true` once the outcome has been delivered to the loop.
    pub fn is_done(&self) -> bool {
        self.inner.is_done()
    }
}

impl<T> Future for Dispatched<T> {
    type Output = Result<T, DispatchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.inner).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(Ok(value))) => Poll::Ready(Ok(value)),
            Poll::Ready(Ok(Err(task))) => Poll::Ready(Err(task.into())),
            Poll::Ready(Err(future)) => Poll::Ready(Err(future.into())),
        }
    }
}

impl<T> fmt::Debug for Dispatched<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_done() { "done" } else { "pending" };
        f.debug_struct("Dispatched").field("state", &state).finish()
    }
}

/// Runs the blocking closure `f` on the global runtime and returns a handle
/// to await its result from the running event loop.
///
/// The global runtime is started with the default configuration if
/// [`init_runtime`](crate::init_runtime) has not been called.
///
/// # Errors
///
/// - [`LoopError::NoRunningLoop`] when called outside an event loop,
/// - [`RuntimeError`](crate::RuntimeError) when the runtime cannot start.
///
/// # Examples
///
/// ```rust,ignore
/// let answer = dispatch(|| 6 * 7)?.await?;
/// assert_eq!(answer, 42);
/// ```
pub fn dispatch<F, T>(f: F) -> Result<Dispatched<T>, DispatchError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let event_loop = get_running_loop()?;
    let runtime = global_or_init()?;

    Ok(dispatch_on(&runtime, &event_loop, f))
}

/// [`dispatch`] with an explicit runtime and loop.
///
/// The loop does not have to be the one running on the calling thread;
/// the handle must be awaited on `event_loop`.
pub fn dispatch_on<F, T>(runtime: &Runtime, event_loop: &LoopHandle, f: F) -> Dispatched<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (inner, promise) = event_loop.create_future();
    let work = runtime.submit(f);
    let target = event_loop.clone();

    // The continuation's own handle is not needed: it only forwards.
    let _ = runtime.then(work, move |outcome| {
        let delivered = target.call_soon_threadsafe(move || promise.set_result(outcome));

        if let Err(LoopError::Closed) = delivered {
            tracing::debug!("event loop closed before the dispatched result arrived; dropping it");
        }
    });

    tracing::trace!("dispatched blocking call");

    Dispatched { inner }
}
