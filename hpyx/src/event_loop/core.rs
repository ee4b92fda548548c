use super::context;
use super::handle::{LoopHandle, Shared};
use super::task::{LocalFuture, LocalTask, TaskInfo};
use super::waker::make_waker;
use crate::runtime::task::core::panic_message;
use crate::utils::Slab;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::thread;

/// Loop state owned by the loop thread.
pub(crate) struct LoopCore {
    /// State other threads reach through a [`LoopHandle`].
    shared: Arc<Shared>,

    /// Every live task, the top-level future included.
    tasks: RefCell<Slab<LocalTask>>,

    /// Id handed to the next registered task.
    next_id: Cell<u64>,

    /// Slot of the task being polled.
    current: Cell<Option<usize>>,
}

impl LoopCore {
    fn new() -> Self {
        Self {
            shared: Arc::new(Shared::new(thread::current())),
            tasks: RefCell::new(Slab::new(16)),
            next_id: Cell::new(1),
            current: Cell::new(None),
        }
    }

    /// A thread-safe handle sharing this loop's queues.
    pub(crate) fn handle(&self) -> LoopHandle {
        LoopHandle {
            shared: self.shared.clone(),
        }
    }

    /// Stores a task and schedules its first poll. Returns `(slot, id)`.
    pub(crate) fn register(&self, name: Option<String>, future: Option<LocalFuture>) -> (usize, u64) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let name = name.unwrap_or_else(|| format!("Task-{id}"));
        let slot = self.tasks.borrow_mut().insert(LocalTask { id, name, future });

        self.shared.schedule(slot, id);
        (slot, id)
    }

    /// Snapshots the live tasks, ordered by id.
    pub(crate) fn task_infos(&self) -> Vec<TaskInfo> {
        let current = self.current.get();

        let mut infos: Vec<_> = self
            .tasks
            .borrow()
            .iter()
            .map(|(slot, task)| TaskInfo {
                id: task.id,
                name: task.name.clone(),
                current: current == Some(slot),
            })
            .collect();

        infos.sort_by_key(|t| t.id);
        infos
    }

    /// Runs every callback queued so far. Callbacks queued while this
    /// batch runs wait for the next iteration.
    ///
    /// A panicking callback is logged and does not stop the loop.
    fn run_callbacks(&self) {
        let batch = std::mem::take(&mut *self.shared.callbacks.lock().unwrap());

        for callback in batch {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(callback)) {
                tracing::error!(
                    panic = %panic_message(payload.as_ref()),
                    "event loop callback panicked"
                );
            }
        }
    }

    /// Takes the batch of tasks woken since the last call.
    fn take_ready(&self) -> VecDeque<(usize, u64)> {
        std::mem::take(&mut *self.shared.ready.lock().unwrap())
    }

    /// `true` when a wake-up or callback arrived and parking would stall it.
    fn has_pending_work(&self) -> bool {
        !self.shared.ready.lock().unwrap().is_empty()
            || !self.shared.callbacks.lock().unwrap().is_empty()
    }

    /// Polls the spawned task at `slot` if it is still the task `id`.
    ///
    /// The future is moved out of the slab for the poll so the task can
    /// spawn or inspect other tasks without a re-entrant borrow.
    fn poll_task(&self, slot: usize, id: u64) {
        let future = match self.tasks.borrow_mut().get_mut(slot) {
            Some(task) if task.id == id => task.future.take(),
            _ => None,
        };

        let Some(mut future) = future else {
            return;
        };

        let waker = make_waker(self.shared.clone(), slot, id);
        let mut cx = Context::from_waker(&waker);

        self.current.set(Some(slot));
        let poll = future.as_mut().poll(&mut cx);
        self.current.set(None);

        match poll {
            Poll::Ready(()) => {
                let finished = self.tasks.borrow_mut().remove(slot);
                drop(finished);
            }
            Poll::Pending => {
                if let Some(task) = self.tasks.borrow_mut().get_mut(slot) {
                    task.future = Some(future);
                }
            }
        }
    }

    /// Closes the loop and drops whatever is still queued or pending.
    fn close(&self) {
        let callbacks = self.shared.close();
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());

        tracing::debug!(
            dropped_callbacks = callbacks.len(),
            // The top-level future is still registered.
            dropped_tasks = tasks.len().saturating_sub(1),
            "event loop closed"
        );

        drop(callbacks);
        drop(tasks);
    }
}

/// A single-threaded cooperative event loop.
///
/// The loop polls its tasks one at a time on the thread that created it.
/// Other threads interact with it through a [`LoopHandle`]: they queue
/// callbacks with [`call_soon_threadsafe`](LoopHandle::call_soon_threadsafe)
/// or complete [`Promise`](super::Promise)s, and both wake the loop.
///
/// # Examples
///
/// ```rust,ignore
/// let value = EventLoop::new().run(async {
///     let child = spawn_local(async { 20 });
///     child.await + 22
/// });
/// assert_eq!(value, 42);
/// ```
pub struct EventLoop {
    core: Rc<LoopCore>,
}

impl EventLoop {
    /// Creates a loop bound to the current thread.
    pub fn new() -> Self {
        Self {
            core: Rc::new(LoopCore::new()),
        }
    }

    /// A handle that can be sent to other threads before the loop runs.
    pub fn handle(&self) -> LoopHandle {
        self.core.handle()
    }

    /// Drives `future` to completion, running spawned tasks and queued
    /// callbacks along the way, then closes the loop. The loop is closed
    /// as well when a task panics out of `run`.
    ///
    /// The top-level future is registered as task `main`. Spawned tasks
    /// still pending when it completes are dropped, and further
    /// `call_soon_threadsafe` calls fail with
    /// [`LoopError::Closed`](crate::LoopError::Closed).
    ///
    /// # Panics
    ///
    /// Panics if another event loop is already running on this thread.
    pub fn run<F: Future>(self, future: F) -> F::Output {
        assert!(
            !context::is_running(),
            "cannot run an event loop while another one is running on this thread"
        );

        let _enter = context::enter(self.core.clone());
        let _close = CloseOnExit(self.core.as_ref());

        let (main_slot, main_id) = self.core.register(Some(String::from("main")), None);
        let waker = make_waker(self.core.shared.clone(), main_slot, main_id);
        let mut cx = Context::from_waker(&waker);

        let mut future = pin!(future);

        let output = 'driver: loop {
            self.core.run_callbacks();

            for (slot, id) in self.core.take_ready() {
                if (slot, id) != (main_slot, main_id) {
                    self.core.poll_task(slot, id);
                    continue;
                }

                self.core.current.set(Some(main_slot));
                let poll = future.as_mut().poll(&mut cx);
                self.core.current.set(None);

                if let Poll::Ready(output) = poll {
                    break 'driver output;
                }
            }

            if !self.core.has_pending_work() {
                thread::park();
            }
        };

        output
    }
}

/// Closes the loop when [`EventLoop::run`] returns or unwinds.
struct CloseOnExit<'a>(&'a LoopCore);

impl Drop for CloseOnExit<'_> {
    fn drop(&mut self) {
        self.0.close();
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("tasks", &self.core.tasks.borrow().len())
            .field("closed", &self.handle().is_closed())
            .finish()
    }
}
