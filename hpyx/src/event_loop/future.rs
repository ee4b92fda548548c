use crate::error::FutureError;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

struct Slot<T> {
    value: Option<Result<T, FutureError>>,
    waker: Option<Waker>,
    /// Set once a value (or the abandonment) has been delivered.
    settled: bool,
}

/// The receiving half created by
/// [`LoopHandle::create_future`](super::LoopHandle::create_future).
///
/// Resolves to the value passed to [`Promise::set_result`], or to
/// [`FutureError::Abandoned`] if the promise is dropped first.
pub struct LoopFuture<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

/// The sending half of a [`LoopFuture`]. `Send`, so it can be completed
/// from any thread; consumed by [`set_result`](Self::set_result).
pub struct Promise<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

pub(crate) fn pair<T>() -> (LoopFuture<T>, Promise<T>) {
    let slot = Arc::new(Mutex::new(Slot {
        value: None,
        waker: None,
        settled: false,
    }));

    (LoopFuture { slot: slot.clone() }, Promise { slot })
}

impl<T> LoopFuture<T> {
    /// `true` once a value or abandonment has been delivered.
    pub fn is_done(&self) -> bool {
        self.slot.lock().unwrap().settled
    }
}

impl<T> Future for LoopFuture<T> {
    type Output = Result<T, FutureError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.lock().unwrap();

        if let Some(value) = slot.value.take() {
            return Poll::Ready(value);
        }

        if slot.settled {
            // Value already taken by an earlier poll.
            return Poll::Ready(Err(FutureError::Abandoned));
        }

        slot.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl<T> Promise<T> {
    /// Delivers `value` and wakes the awaiting task.
    pub fn set_result(self, value: T) {
        self.settle(Ok(value));
    }

    fn settle(&self, value: Result<T, FutureError>) {
        let waker = {
            let mut slot = self.slot.lock().unwrap();

            if slot.settled {
                return;
            }

            slot.value = Some(value);
            slot.settled = true;
            slot.waker.take()
        };

        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        self.settle(Err(FutureError::Abandoned));
    }
}

impl<T> fmt::Debug for LoopFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_done() { "done" } else { "pending" };
        f.debug_struct("LoopFuture").field("state", &state).finish()
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise").finish_non_exhaustive()
    }
}
