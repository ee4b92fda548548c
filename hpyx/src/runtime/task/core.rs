use super::PoolFuture;
use super::state::{COMPLETED, IDLE, NOTIFIED, QUEUED, RUNNING};
use crate::error::TaskError;
use crate::runtime::context::{CURRENT_INJECTOR, CURRENT_LOCALS, CURRENT_WORKER_ID};
use crate::runtime::task::waker::make_waker;
use crate::runtime::work_stealing::injector::Injector;

use std::any::Any;
use std::cell::UnsafeCell;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// A runnable unit of work that can be executed by the scheduler.
///
/// Erases the output type so queues can hold `Arc<dyn Runnable>`.
pub(crate) trait Runnable: Send + Sync {
    fn run(self: Arc<Self>);

    /// Marks the task as failed because the runtime will never run it.
    fn abandon(&self);
}

/// Outcome slot of a task.
pub(crate) type Outcome<T> = Option<Result<T, TaskError>>;

/// A unit of work submitted to the dispatch runtime.
///
/// Owns the pinned future, its outcome once produced, and the wakers of
/// whoever is waiting on the matching [`PoolFuture`].
pub(crate) struct Task<T> {
    /// Taken (and dropped) once the task completes.
    future: UnsafeCell<Option<Pin<Box<dyn Future<Output = T> + Send>>>>,

    pub(crate) outcome: UnsafeCell<Outcome<T>>,

    pub(crate) state: AtomicUsize,

    /// Where the task goes back when woken, and where continuations go.
    pub(crate) injector: Arc<Injector>,

    pub(crate) waiters: Mutex<Vec<Waker>>,
}

// Safety: `future` is only touched by the thread that moved the task into
// RUNNING (or that owns it in QUEUED while abandoning it); `outcome` is
// written before the Release store of COMPLETED and read after an Acquire
// load observing it.
unsafe impl<T: Send> Send for Task<T> {}
unsafe impl<T: Send> Sync for Task<T> {}

impl<T: Send + 'static> Task<T> {
    /// Creates a task in the `QUEUED` state.
    pub(crate) fn new<F>(future: F, injector: Arc<Injector>) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            future: UnsafeCell::new(Some(Box::pin(future))),
            outcome: UnsafeCell::new(None),
            state: AtomicUsize::new(QUEUED),
            injector,
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Polls the future once.
    ///
    /// A panic raised by the future is caught and stored as
    /// [`TaskError::Panicked`]; the worker thread survives it.
    pub(crate) fn run(self: Arc<Self>) {
        let current = self.state.load(Ordering::Acquire);

        if current != QUEUED && current != NOTIFIED {
            return;
        }

        if self
            .state
            .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let waker = make_waker(self.clone());
        let mut cx = Context::from_waker(&waker);

        // Safety: RUNNING gives this thread exclusive access to `future`.
        let slot = unsafe { &mut *self.future.get() };
        let Some(future) = slot.as_mut() else {
            return;
        };

        let poll = panic::catch_unwind(AssertUnwindSafe(|| future.as_mut().poll(&mut cx)));

        match poll {
            Ok(Poll::Pending) => {
                if self
                    .state
                    .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    // Woken during the poll.
                    self.state.store(QUEUED, Ordering::Release);
                    if !self.injector.push(self.clone()) {
                        self.abandon();
                    }
                }
            }
            Ok(Poll::Ready(value)) => {
                *slot = None;
                self.complete(Ok(value));
            }
            Err(payload) => {
                *slot = None;
                self.complete(Err(TaskError::Panicked(panic_message(payload.as_ref()))));
            }
        }
    }

    /// Reschedules the task.
    ///
    /// IDLE tasks are pushed to the injector; RUNNING tasks are flagged
    /// NOTIFIED so that [`run`](Self::run) re-queues them itself.
    pub(crate) fn wake(self: Arc<Self>) {
        loop {
            match self.state.load(Ordering::Acquire) {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        if !self.injector.push(self.clone()) {
                            self.abandon();
                        }
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    fn complete(&self, outcome: Result<T, TaskError>) {
        // Safety: the caller holds RUNNING (or owns the QUEUED task), so
        // nobody reads `outcome` until COMPLETED is published below.
        unsafe {
            *self.outcome.get() = Some(outcome);
        }
        self.state.store(COMPLETED, Ordering::Release);

        let waiters = std::mem::take(&mut *self.waiters.lock().unwrap());
        for w in waiters {
            w.wake();
        }
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::run(self)
    }

    fn abandon(&self) {
        if self
            .state
            .compare_exchange(QUEUED, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        // Safety: we just moved the task into RUNNING.
        unsafe {
            *self.future.get() = None;
        }
        self.complete(Err(TaskError::Abandoned));
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("non-string panic payload")
    }
}

/// Spawns a future onto the runtime the current thread belongs to.
///
/// On a worker thread the task goes to that worker's local queue; on any
/// other thread inside the runtime context it goes to the global injector.
///
/// # Panics
///
/// Panics if called outside of a worker thread or
/// [`Runtime::block_on`](crate::Runtime::block_on).
pub fn spawn<F, T>(future: F) -> PoolFuture<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let injector = CURRENT_INJECTOR.with(|cell| {
        cell.borrow()
            .as_ref()
            .expect("spawn must be called within the context of a runtime")
            .clone()
    });

    let task = Arc::new(Task::new(future, injector.clone()));

    let pushed_locally = CURRENT_WORKER_ID.with(|id_cell| {
        let Some(id) = *id_cell.borrow() else {
            return false;
        };

        CURRENT_LOCALS.with(|locals_cell| match locals_cell.borrow().as_ref() {
            Some(locals) => {
                locals[id].push(task.clone());
                true
            }
            None => false,
        })
    });

    if !pushed_locally && !injector.push(task.clone()) {
        task.abandon();
    }

    PoolFuture::new(task)
}
