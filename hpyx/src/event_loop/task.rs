use super::context::with_current;
use crate::error::LoopError;

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

pub(crate) type LocalFuture = Pin<Box<dyn Future<Output = ()>>>;

/// A task stored in the loop's slab.
pub(crate) struct LocalTask {
    pub(crate) id: u64,

    pub(crate) name: String,

    /// `None` for the top-level future, which `run` polls in place, and
    /// while the task is being polled.
    pub(crate) future: Option<LocalFuture>,
}

/// Snapshot of a live event-loop task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    /// Unique for the lifetime of the loop, starting at 1 for the
    /// top-level future.
    pub id: u64,

    pub name: String,

    /// Whether this is the task being polled right now.
    pub current: bool,
}

impl fmt::Display for TaskInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Task pending name='{}' id={}", self.name, self.id)?;
        if self.current {
            f.write_str(" current")?;
        }
        f.write_str(">")
    }
}

struct JoinState<T> {
    value: Option<T>,
    waker: Option<Waker>,
}

/// Awaits the output of a task spawned with [`spawn_local`].
///
/// Dropping the handle detaches the task; it keeps running.
pub struct LocalJoinHandle<T> {
    state: Rc<RefCell<JoinState<T>>>,
    id: u64,
}

impl<T> LocalJoinHandle<T> {
    /// Id of the spawned task, as reported by [`all_tasks`].
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.state.borrow().value.is_some()
    }
}

impl<T> Future for LocalJoinHandle<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut state = self.state.borrow_mut();

        match state.value.take() {
            Some(value) => Poll::Ready(value),
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

/// Spawns a task on the running event loop.
///
/// The future does not need to be `Send`; it only ever runs on the loop
/// thread. Tasks still alive when the top-level future completes are
/// dropped.
///
/// # Panics
///
/// Panics if no event loop is running on the current thread.
pub fn spawn_local<F>(future: F) -> LocalJoinHandle<F::Output>
where
    F: Future + 'static,
{
    spawn_inner(None, future)
}

/// Like [`spawn_local`], with a name reported by [`all_tasks`].
pub fn spawn_named<F>(name: impl Into<String>, future: F) -> LocalJoinHandle<F::Output>
where
    F: Future + 'static,
{
    spawn_inner(Some(name.into()), future)
}

fn spawn_inner<F>(name: Option<String>, future: F) -> LocalJoinHandle<F::Output>
where
    F: Future + 'static,
{
    let state = Rc::new(RefCell::new(JoinState {
        value: None,
        waker: None,
    }));

    let output = state.clone();
    let wrapped: LocalFuture = Box::pin(async move {
        let value = future.await;

        let waker = {
            let mut output = output.borrow_mut();
            output.value = Some(value);
            output.waker.take()
        };

        if let Some(waker) = waker {
            waker.wake();
        }
    });

    let id = with_current(|core| core.register(name, Some(wrapped)).1)
        .expect("spawn_local must be called within a running event loop");

    LocalJoinHandle { state, id }
}

/// Lists the tasks alive on the running loop, ordered by id.
///
/// The top-level future passed to [`EventLoop::run`](super::EventLoop::run)
/// is always included while it is pending.
pub fn all_tasks() -> Result<Vec<TaskInfo>, LoopError> {
    with_current(|core| core.task_infos())
}

/// The task currently being polled, if called from inside a loop task.
pub fn current_task() -> Option<TaskInfo> {
    with_current(|core| core.task_infos().into_iter().find(|t| t.current))
        .ok()
        .flatten()
}
