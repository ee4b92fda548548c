//! Process-wide runtime.
//!
//! At most one global [`Runtime`] exists at a time. It is started either
//! explicitly with [`init_runtime`] or lazily by the first
//! [`dispatch`](crate::dispatch), and torn down with [`stop_runtime`].

use super::Runtime;
use crate::config::RuntimeConfig;
use crate::error::RuntimeError;

use std::sync::{Arc, Mutex};

static GLOBAL: Mutex<Option<Arc<Runtime>>> = Mutex::new(None);

/// Starts the global runtime from `key=value` entries.
///
/// Does nothing if the runtime is already running; the entries are then
/// not even parsed.
///
/// # Examples
///
/// ```rust,ignore
/// hpyx::init_runtime(["hpyx.os_threads=4"])?;
/// ```
pub fn init_runtime<I, S>(entries: I) -> Result<(), RuntimeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut slot = GLOBAL.lock().unwrap();

    if slot.is_some() {
        tracing::debug!("global runtime already running; ignoring config");
        return Ok(());
    }

    let config = RuntimeConfig::from_entries(entries)?;
    *slot = Some(Arc::new(Runtime::new(config)?));
    Ok(())
}

/// Starts the global runtime from a prepared configuration.
///
/// Same idempotence as [`init_runtime`].
pub fn init_runtime_with(config: RuntimeConfig) -> Result<(), RuntimeError> {
    let mut slot = GLOBAL.lock().unwrap();

    if slot.is_none() {
        *slot = Some(Arc::new(Runtime::new(config)?));
    }
    Ok(())
}

/// Stops the global runtime, waiting for queued work to finish.
///
/// A no-op when no runtime is running. Handles obtained earlier through
/// [`handle`] keep the `Runtime` value alive, but it no longer accepts
/// work.
pub fn stop_runtime() {
    let runtime = GLOBAL.lock().unwrap().take();

    if let Some(runtime) = runtime {
        runtime.shutdown();
    }
}

/// Returns the global runtime.
pub fn handle() -> Result<Arc<Runtime>, RuntimeError> {
    GLOBAL
        .lock()
        .unwrap()
        .as_ref()
        .cloned()
        .ok_or(RuntimeError::NotRunning)
}

pub fn is_running() -> bool {
    GLOBAL.lock().unwrap().is_some()
}

/// Returns the global runtime, starting one with the default
/// configuration if needed.
pub(crate) fn global_or_init() -> Result<Arc<Runtime>, RuntimeError> {
    let mut slot = GLOBAL.lock().unwrap();

    if let Some(runtime) = slot.as_ref() {
        return Ok(runtime.clone());
    }

    let runtime = Arc::new(Runtime::new(RuntimeConfig::default())?);
    tracing::info!(
        os_threads = runtime.workers(),
        "started global runtime with default configuration"
    );

    *slot = Some(runtime.clone());
    Ok(runtime)
}
