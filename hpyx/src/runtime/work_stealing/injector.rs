use crate::runtime::task::Runnable;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Shared handle to the global task injector.
pub(crate) type InjectorHandle = Arc<Injector>;

/// How long an idle worker sleeps before re-checking the peers' queues,
/// which do not signal the condvar.
const PARK_TIMEOUT: Duration = Duration::from_millis(1);

/// Global queue for work submitted from outside the workers.
///
/// It also parks idle workers and wakes them when work arrives or the
/// runtime shuts down.
pub(crate) struct Injector {
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,

    /// Number of workers currently parked on `condvar`.
    parked: Mutex<usize>,

    condvar: Condvar,

    /// Set once the workers are gone; no work is accepted afterwards.
    closed: AtomicBool,
}

impl Injector {
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            parked: Mutex::new(0),
            condvar: Condvar::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Wakes every parked worker so it can observe a shutdown request.
    pub(crate) fn wake_all(&self) {
        self.condvar.notify_all();
    }

    /// Stops accepting work. Called once no worker is left to run it.
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.condvar.notify_all();
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Enqueues a task and wakes one parked worker.
    ///
    /// Returns `false` when the injector is closed; the caller is expected
    /// to abandon the task.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) -> bool {
        if self.is_closed() {
            return false;
        }

        self.queue.lock().unwrap().push_back(task);

        if *self.parked.lock().unwrap() > 0 {
            self.condvar.notify_one();
        }
        true
    }

    /// Parks the calling worker until work arrives, shutdown starts, or
    /// the park timeout elapses.
    pub(crate) fn park(&self) {
        if self.is_closed() || !self.queue.lock().unwrap().is_empty() {
            return;
        }

        let mut parked = self.parked.lock().unwrap();
        *parked += 1;

        let (mut parked, _) = self.condvar.wait_timeout(parked, PARK_TIMEOUT).unwrap();
        *parked -= 1;
    }

    /// Takes the oldest task.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        self.queue.lock().unwrap().pop_front()
    }

    /// Removes every queued task; used after the workers have exited.
    pub(crate) fn drain(&self) -> Vec<Arc<dyn Runnable>> {
        self.queue.lock().unwrap().drain(..).collect()
    }
}
