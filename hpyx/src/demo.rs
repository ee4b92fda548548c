//! The dispatch demonstration.
//!
//! [`launch_and_await`] runs the launch-two-await-one scenario: dispatch the
//! same blocking computation twice, show what the event loop is running,
//! and await only the first handle. The second handle is deliberately
//! left unobserved; the loop finishes without it.

use crate::dispatch::dispatch;
use crate::error::DispatchError;
use crate::event_loop::{TaskInfo, all_tasks};
use crate::time::instrumented;

use std::any;
use std::thread;
use std::time::{Duration, Instant};

/// How long [`slow_task`] blocks.
pub const SLOW_TASK_DURATION: Duration = Duration::from_secs(2);

/// What [`launch_and_await`] observed.
#[derive(Debug, Clone)]
pub struct DemoReport<T> {
    /// Result of the first (awaited) dispatch.
    pub result: T,

    /// Time spent issuing both dispatches and listing tasks.
    pub launch_elapsed: Duration,

    /// Time spent suspended on the first handle.
    pub wait_elapsed: Duration,

    /// Loop tasks alive right after the dispatches.
    pub tasks: Vec<TaskInfo>,

    /// Type name of the dispatch handle.
    pub handle_type: &'static str,
}

/// A blocking computation: sleeps for [`SLOW_TASK_DURATION`] and returns 42.
pub fn slow_task() -> i64 {
    tracing::info!("started slow task");
    thread::sleep(SLOW_TASK_DURATION);
    tracing::info!("finished slow task");
    42
}

/// Dispatches `work` twice, reports the loop's tasks, then awaits only the
/// first dispatch.
///
/// Must run inside an event loop.
pub async fn launch_and_await<F, T>(work: F) -> Result<DemoReport<T>, DispatchError>
where
    F: Fn() -> T + Clone + Send + 'static,
    T: Send + 'static,
{
    let start = Instant::now();

    let first = dispatch(work.clone())?;
    let _second = dispatch(work)?;
    tracing::info!("launched async call");

    let tasks = all_tasks()?;
    for task in &tasks {
        tracing::info!(%task, "current task in the event loop");
    }

    let launch_elapsed = start.elapsed();
    tracing::info!(elapsed = ?launch_elapsed, "time to launch async");

    let handle_type = type_name_of(&first);
    tracing::info!(handle_type, "type of future");

    let (result, wait_elapsed) = instrumented(first).await;
    let result = result?;

    Ok(DemoReport {
        result,
        launch_elapsed,
        wait_elapsed,
        tasks,
        handle_type,
    })
}

fn type_name_of<T>(_: &T) -> &'static str {
    any::type_name::<T>()
}
