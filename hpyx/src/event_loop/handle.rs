use super::future::{self, LoopFuture, Promise};
use crate::error::LoopError;

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::Thread;

pub(crate) type Callback = Box<dyn FnOnce() + Send>;

/// Loop state reachable from other threads.
pub(crate) struct Shared {
    /// `(slot, task id)` pairs of woken tasks.
    pub(crate) ready: Mutex<VecDeque<(usize, u64)>>,

    /// Callbacks queued by [`LoopHandle::call_soon_threadsafe`]. Also
    /// guards the transition to `closed`.
    pub(crate) callbacks: Mutex<VecDeque<Callback>>,

    pub(crate) closed: AtomicBool,

    /// The thread driving the loop; unparked on every wake-up.
    pub(crate) thread: Thread,
}

impl Shared {
    pub(crate) fn new(thread: Thread) -> Self {
        Self {
            ready: Mutex::new(VecDeque::new()),
            callbacks: Mutex::new(VecDeque::new()),
            closed: AtomicBool::new(false),
            thread,
        }
    }

    pub(crate) fn schedule(&self, slot: usize, id: u64) {
        self.ready.lock().unwrap().push_back((slot, id));
        self.thread.unpark();
    }

    /// Marks the loop closed and returns the callbacks that will never run.
    pub(crate) fn close(&self) -> VecDeque<Callback> {
        let mut callbacks = self.callbacks.lock().unwrap();
        self.closed.store(true, Ordering::Release);
        std::mem::take(&mut *callbacks)
    }
}

/// A thread-safe handle to an event loop.
///
/// Obtained from [`EventLoop::handle`](super::EventLoop::handle) or
/// [`get_running_loop`](super::get_running_loop). Cheap to clone.
#[derive(Clone)]
pub struct LoopHandle {
    pub(crate) shared: Arc<Shared>,
}

impl LoopHandle {
    /// Queues `callback` to run on the loop thread and wakes the loop.
    ///
    /// Callbacks run in FIFO order, before the next round of task polls.
    /// Fails with [`LoopError::Closed`] once the loop has finished; the
    /// callback is then dropped without running.
    pub fn call_soon_threadsafe<F>(&self, callback: F) -> Result<(), LoopError>
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut callbacks = self.shared.callbacks.lock().unwrap();

            if self.shared.closed.load(Ordering::Acquire) {
                return Err(LoopError::Closed);
            }

            callbacks.push_back(Box::new(callback));
        }

        self.shared.thread.unpark();
        Ok(())
    }

    /// Creates a one-shot future to be awaited on this loop and the
    /// promise that completes it.
    pub fn create_future<T>(&self) -> (LoopFuture<T>, Promise<T>) {
        future::pair()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }
}

impl fmt::Debug for LoopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopHandle")
            .field("thread", &self.shared.thread.name().unwrap_or("<unnamed>"))
            .field("closed", &self.is_closed())
            .finish()
    }
}
