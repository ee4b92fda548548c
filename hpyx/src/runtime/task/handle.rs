use crate::error::TaskError;
use crate::runtime::task::{Runnable, Task};
use crate::runtime::task::state::{self, COMPLETED};

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::task::{Context, Poll, Wake, Waker};
use std::thread::{self, Thread};

/// Handle to a unit of work running on the dispatch runtime.
///
/// A `PoolFuture` can be:
/// - awaited from any executor, including the event loop,
/// - blocked on with [`get`](Self::get),
/// - chained with [`then`](Self::then).
///
/// Dropping it does **not** cancel the work; it only discards the result.
pub struct PoolFuture<T> {
    task: Arc<Task<T>>,
}

impl<T: Send + 'static> PoolFuture<T> {
    pub(crate) fn new(task: Arc<Task<T>>) -> Self {
        Self { task }
    }

    /// Returns `true` once the outcome is available.
    pub fn is_ready(&self) -> bool {
        self.task.state.load(Ordering::Acquire) == COMPLETED
    }

    /// Blocks the current thread until the outcome is available.
    ///
    /// Calling this from a worker thread ties up that worker for the
    /// duration of the wait.
    pub fn get(mut self) -> Result<T, TaskError> {
        let waker = Waker::from(Arc::new(ThreadWaker(thread::current())));
        let mut cx = Context::from_waker(&waker);

        loop {
            if let Poll::Ready(outcome) = Pin::new(&mut self).poll(&mut cx) {
                return outcome;
            }
            thread::park();
        }
    }

    /// Schedules `f` to run on the pool with this task's outcome and
    /// returns a handle to the continuation's result.
    ///
    /// Works from any thread: the continuation goes to the injector of the
    /// runtime that owns this task. If that runtime is already gone the
    /// continuation resolves to [`TaskError::Abandoned`] without running.
    pub fn then<U, F>(self, f: F) -> PoolFuture<U>
    where
        U: Send + 'static,
        F: FnOnce(Result<T, TaskError>) -> U + Send + 'static,
    {
        let injector = self.task.injector.clone();
        let next = Arc::new(Task::new(async move { f(self.await) }, injector.clone()));

        if !injector.push(next.clone()) {
            next.abandon();
        }

        PoolFuture::new(next)
    }

    /// Takes the stored outcome once COMPLETED has been observed.
    fn take_outcome(&self) -> Result<T, TaskError> {
        // Safety: COMPLETED was observed with Acquire, so the write of the
        // outcome is visible and the producer no longer touches it.
        unsafe { (*self.task.outcome.get()).take() }.unwrap_or(Err(TaskError::Abandoned))
    }
}

impl<T: Send + 'static> Future for PoolFuture<T> {
    type Output = Result<T, TaskError>;

    /// Registers the waker **before** re-checking the state so a completion
    /// racing with this poll is never missed.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.is_ready() {
            return Poll::Ready(self.take_outcome());
        }

        {
            let mut waiters = self.task.waiters.lock().unwrap();
            if !waiters.iter().any(|w| w.will_wake(cx.waker())) {
                waiters.push(cx.waker().clone());
            }
        }

        if self.is_ready() {
            return Poll::Ready(self.take_outcome());
        }

        Poll::Pending
    }
}

impl<T> fmt::Debug for PoolFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolFuture")
            .field("state", &state::name(self.task.state.load(Ordering::Acquire)))
            .finish()
    }
}

/// Unparks a blocked thread.
struct ThreadWaker(Thread);

impl Wake for ThreadWaker {
    fn wake(self: Arc<Self>) {
        self.0.unpark();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.0.unpark();
    }
}

/// Waits for every future and returns their outcomes in input order.
///
/// All tasks keep running concurrently on the pool; only the collection
/// happens in order.
pub async fn when_all<T, I>(futures: I) -> Vec<Result<T, TaskError>>
where
    T: Send + 'static,
    I: IntoIterator<Item = PoolFuture<T>>,
{
    let mut outcomes = Vec::new();

    for future in futures {
        outcomes.push(future.await);
    }

    outcomes
}
