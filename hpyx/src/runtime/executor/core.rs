use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::runtime::executor::worker::Worker;
use crate::runtime::task::{PoolFuture, Runnable, Task};
use crate::runtime::work_stealing::injector::Injector;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// Multi-threaded work-stealing executor.
///
/// Owns the global injector, the local queues and the worker threads.
pub(crate) struct Executor {
    /// Global injector queue shared by all workers.
    injector: Arc<Injector>,

    /// One local queue per worker, indexed by worker id.
    locals: Arc<Vec<Arc<LocalQueue>>>,

    /// Join handles for worker threads; emptied by [`join`](Self::join).
    handles: Mutex<Vec<JoinHandle<()>>>,

    /// Number of workers started.
    threads: usize,

    /// Shutdown flag shared with all workers.
    shutdown: Arc<AtomicBool>,
}

impl Executor {
    /// Spawns `config.os_threads` named workers.
    ///
    /// If a thread fails to spawn, the workers already started are shut
    /// down before the error is returned.
    pub(crate) fn new(config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        let threads = config.os_threads;

        let locals: Arc<Vec<_>> = Arc::new(
            (0..threads)
                .map(|_| Arc::new(LocalQueue::new()))
                .collect(),
        );

        let executor = Self {
            injector: Arc::new(Injector::new()),
            locals,
            handles: Mutex::new(Vec::with_capacity(threads)),
            threads,
            shutdown: Arc::new(AtomicBool::new(false)),
        };

        for id in 0..threads {
            let worker = Worker::new(
                id,
                executor.locals.clone(),
                executor.injector.clone(),
                config.bind,
            );
            let shutdown = executor.shutdown.clone();

            let mut builder = thread::Builder::new().name(format!("{}-{id}", config.thread_name));
            if let Some(size) = config.stack_size {
                builder = builder.stack_size(size);
            }

            match builder.spawn(move || worker.run(shutdown)) {
                Ok(handle) => executor.handles.lock().unwrap().push(handle),
                Err(err) => {
                    executor.shutdown();
                    executor.join();
                    return Err(RuntimeError::Spawn(err));
                }
            }
        }

        Ok(executor)
    }

    /// Number of worker threads the executor was started with.
    pub(crate) fn workers(&self) -> usize {
        self.threads
    }

    /// Asks workers to exit once the queues are drained.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.injector.wake_all();
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// `true` once [`join`](Self::join) has completed.
    pub(crate) fn is_joined(&self) -> bool {
        self.injector.is_closed()
    }

    /// Queues a future on the global injector.
    ///
    /// After shutdown has begun the returned future resolves to
    /// [`TaskError::Abandoned`](crate::TaskError::Abandoned).
    pub(crate) fn spawn<F, T>(&self, future: F) -> PoolFuture<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let task = Arc::new(Task::new(future, self.injector.clone()));

        if self.is_shutdown() || !self.injector.push(task.clone()) {
            task.abandon();
        }

        PoolFuture::new(task)
    }

    /// Joins every worker, then abandons whatever work is still queued.
    ///
    /// Calling it again after the workers are gone is a no-op.
    pub(crate) fn join(&self) {
        let handles = std::mem::take(&mut *self.handles.lock().unwrap());
        for h in handles {
            let _ = h.join();
        }

        self.injector.close();

        let leftovers = self
            .injector
            .drain()
            .into_iter()
            .chain(self.locals.iter().flat_map(|local| local.drain()));

        for task in leftovers {
            task.abandon();
        }
    }
}
