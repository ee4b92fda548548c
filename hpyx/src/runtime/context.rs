use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    /// Injector of the runtime the current thread is executing for.
    ///
    /// Lets [`spawn`](crate::runtime::spawn) find the pool without a handle.
    pub(crate) static CURRENT_INJECTOR: RefCell<Option<InjectorHandle>> =
        const { RefCell::new(None) };

    /// Index of the current worker, `None` off the pool.
    pub(crate) static CURRENT_WORKER_ID: RefCell<Option<usize>> =
        const { RefCell::new(None) };

    /// Every worker's local queue, indexed by worker id.
    pub(crate) static CURRENT_LOCALS: RefCell<Option<Arc<Vec<Arc<LocalQueue>>>>> =
        const { RefCell::new(None) };
}

/// Runs `f` with `injector` installed as the current runtime, restoring
/// whatever was installed before.
pub(crate) fn enter_context<R>(injector: InjectorHandle, f: impl FnOnce() -> R) -> R {
    let prev = CURRENT_INJECTOR.with(|i| i.replace(Some(injector)));

    let out = f();

    CURRENT_INJECTOR.with(|i| i.replace(prev));
    out
}

/// Installs the worker-local part of the context for the rest of the
/// thread's life.
pub(crate) fn enter_worker(id: usize, locals: Arc<Vec<Arc<LocalQueue>>>) {
    CURRENT_WORKER_ID.with(|w| *w.borrow_mut() = Some(id));
    CURRENT_LOCALS.with(|l| *l.borrow_mut() = Some(locals));
}

/// Returns `true` when called from a pool worker thread.
pub fn is_worker_thread() -> bool {
    CURRENT_WORKER_ID.with(|w| w.borrow().is_some())
}
