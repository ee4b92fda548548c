use hpyx::event_loop::{self, EventLoop, all_tasks};
use hpyx::{DispatchError, LoopError, RuntimeBuilder, TaskError, dispatch, dispatch_on, join};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

fn sleepy(ms: u64, value: i64) -> impl Fn() -> i64 + Clone + Send + 'static {
    move || {
        thread::sleep(Duration::from_millis(ms));
        value
    }
}

#[hpyx::test]
async fn test_dispatch_returns_value() -> Result<(), DispatchError> {
    let answer = dispatch(|| 6 * 7)?.await?;

    assert_eq!(answer, 42);
    Ok(())
}

#[hpyx::test]
async fn test_dispatch_does_not_block_the_loop() -> Result<(), DispatchError> {
    let start = Instant::now();

    let first = dispatch(sleepy(300, 42))?;
    let second = dispatch(sleepy(300, 42))?;

    let launch = start.elapsed();
    assert!(launch < Duration::from_millis(150), "launch took {launch:?}");
    assert!(!first.is_done());

    let (a, b) = join!(first, second);
    assert_eq!((a?, b?), (42, 42));
    Ok(())
}

#[hpyx::test]
async fn test_main_task_is_pending_during_dispatch() -> Result<(), DispatchError> {
    let handle = dispatch(sleepy(50, 1))?;

    let tasks = all_tasks()?;
    assert!(tasks.iter().any(|t| t.name == "main" && t.current));

    handle.await?;
    Ok(())
}

#[hpyx::test]
async fn test_dispatch_panic_propagates() {
    let handle = dispatch(|| -> i64 { panic!("slow task failed") }).unwrap();

    match handle.await {
        Err(DispatchError::Task(TaskError::Panicked(msg))) => assert_eq!(msg, "slow task failed"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_dispatch_outside_loop_fails() {
    let err = dispatch(|| 1).unwrap_err();

    assert!(matches!(err, DispatchError::Loop(LoopError::NoRunningLoop)));
}

#[test]
fn test_unawaited_handle_does_not_block_exit() {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();

    let result = event_loop::run(async move {
        let first = dispatch(|| 42)?;
        let _second = dispatch(move || {
            thread::sleep(Duration::from_millis(300));
            flag.store(true, Ordering::SeqCst);
        })?;

        first.await
    });

    assert_eq!(result.unwrap(), 42);

    // The loop is gone; the pool still runs the second call to the end
    // and its late result is refused without a panic.
    let deadline = Instant::now() + Duration::from_secs(5);
    while !finished.load(Ordering::SeqCst) && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert!(finished.load(Ordering::SeqCst));
}

#[test]
fn test_dispatch_on_private_runtime() {
    let runtime = RuntimeBuilder::new().worker_threads(2).build().unwrap();
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();

    let result = event_loop.run(async move {
        let a = dispatch_on(&runtime, &handle, || 20);
        let b = dispatch_on(&runtime, &handle, || 22);

        Ok::<_, DispatchError>(a.await? + b.await?)
    });

    assert_eq!(result.unwrap(), 42);
}
