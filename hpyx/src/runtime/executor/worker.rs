use crate::config::BindPolicy;
use crate::runtime::affinity::bind_current;
use crate::runtime::context::{enter_context, enter_worker};
use crate::runtime::task::Runnable;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A pool worker thread.
///
/// Lookup order for the next task:
/// 1. own local queue (newest first)
/// 2. global injector (oldest first)
/// 3. peers' local queues, round-robin starting after itself
/// 4. park briefly
///
/// Once shutdown is requested the worker keeps draining until all three
/// sources come up empty, then exits.
pub(crate) struct Worker {
    /// Index of the worker, also its slot in `locals`.
    id: usize,

    /// All local queues (one per worker).
    ///
    /// The worker pops from its own and steals from the others.
    locals: Arc<Vec<Arc<LocalQueue>>>,

    /// Handle to the global injector queue.
    injector: InjectorHandle,

    /// Core pinning applied when the thread starts.
    bind: BindPolicy,
}

impl Worker {
    /// Creates a worker.
    ///
    /// # Arguments
    ///
    /// * `id` - Worker identifier
    /// * `locals` - Shared vector of all local queues
    /// * `injector` - Handle to the global injector
    /// * `bind` - Pinning policy for the worker thread
    pub(crate) fn new(
        id: usize,
        locals: Arc<Vec<Arc<LocalQueue>>>,
        injector: InjectorHandle,
        bind: BindPolicy,
    ) -> Self {
        Self {
            id,
            locals,
            injector,
            bind,
        }
    }

    /// Runs the worker loop on the current thread.
    ///
    /// Installs the worker context, applies the pinning policy, then
    /// executes tasks until `shutdown` is set and no work is left
    /// anywhere. A failed pin is logged and the worker runs unpinned.
    pub(crate) fn run(self, shutdown: Arc<AtomicBool>) {
        enter_worker(self.id, self.locals.clone());

        if !bind_current(self.bind, self.id) {
            tracing::warn!(worker = self.id, policy = ?self.bind, "failed to pin worker thread");
        }

        tracing::debug!(worker = self.id, "worker started");

        enter_context(self.injector.clone(), || {
            loop {
                if let Some(task) = self.next_task() {
                    task.run();
                    continue;
                }

                if shutdown.load(Ordering::Acquire) {
                    break;
                }

                self.injector.park();
            }
        });

        tracing::debug!(worker = self.id, "worker stopped");
    }

    /// Local queue, then injector, then peers.
    fn next_task(&self) -> Option<Arc<dyn Runnable>> {
        self.locals[self.id]
            .pop()
            .or_else(|| self.injector.steal())
            .or_else(|| self.try_steal())
    }

    /// Steals the oldest task of the first peer that has one.
    fn try_steal(&self) -> Option<Arc<dyn Runnable>> {
        let len = self.locals.len();

        if len <= 1 {
            return None;
        }

        (1..len)
            .map(|offset| (self.id + offset) % len)
            .find_map(|victim| self.locals[victim].steal())
    }
}
