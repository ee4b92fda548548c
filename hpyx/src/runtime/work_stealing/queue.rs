use crate::runtime::task::Runnable;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A per-worker run queue.
///
/// The owning worker pushes and pops at the back (LIFO, cache friendly);
/// peers steal from the front (FIFO) so the oldest work migrates first.
pub(crate) struct LocalQueue {
    /// Tasks, oldest at the front.
    inner: Mutex<VecDeque<Arc<dyn Runnable>>>,
}

impl LocalQueue {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Owner side: used by nested spawns on this worker.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.inner.lock().unwrap().push_back(task);
    }

    /// Owner side: newest task first.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        self.inner.lock().unwrap().pop_back()
    }

    /// Thief side: oldest task first.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Empties the queue once its worker has exited.
    pub(crate) fn drain(&self) -> Vec<Arc<dyn Runnable>> {
        self.inner.lock().unwrap().drain(..).collect()
    }
}
