use hpyx::runtime::spawn;
use hpyx::{BindPolicy, RuntimeBuilder, TaskError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn test_single_worker_thread() {
    let rt = RuntimeBuilder::new().worker_threads(1).build().unwrap();

    let result = rt.block_on(async { 42 });
    assert_eq!(result, Ok(42));
}

#[test]
fn test_multiple_worker_threads() {
    let rt = RuntimeBuilder::new().worker_threads(4).build().unwrap();

    assert_eq!(rt.workers(), 4);
    assert_eq!(rt.block_on(async { 100 }), Ok(100));
}

#[test]
fn test_worker_threads_parallel_execution() {
    let rt = RuntimeBuilder::new().worker_threads(4).build().unwrap();

    let counter = Arc::new(Mutex::new(0));
    let results = Arc::new(Mutex::new(Vec::new()));

    let counter_clone = counter.clone();
    let results_clone = results.clone();

    rt.block_on(async move {
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let counter = counter_clone.clone();
                let results = results_clone.clone();

                spawn(async move {
                    let mut c = counter.lock().unwrap();
                    *c += 1;
                    drop(c);

                    results.lock().unwrap().push(i);
                    i * 2
                })
            })
            .collect();

        for handle in handles {
            let _ = handle.await;
        }
    })
    .unwrap();

    assert_eq!(*counter.lock().unwrap(), 10);
    assert_eq!(results.lock().unwrap().len(), 10);
}

#[test]
fn test_worker_threads_stress() {
    let rt = RuntimeBuilder::new().worker_threads(8).build().unwrap();

    let counter = Arc::new(Mutex::new(0));
    let counter_clone = counter.clone();

    rt.block_on(async move {
        let handles: Vec<_> = (0..100)
            .map(|_| {
                let counter = counter_clone.clone();
                spawn(async move {
                    let mut c = counter.lock().unwrap();
                    *c += 1;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
    })
    .unwrap();

    assert_eq!(*counter.lock().unwrap(), 100);
}

#[test]
fn test_worker_threads_chain_spawn() {
    let rt = RuntimeBuilder::new().worker_threads(4).build().unwrap();

    let result = rt.block_on(async {
        let handle1 = spawn(async {
            let handle2 = spawn(async {
                let handle3 = spawn(async { 10 });
                handle3.await.unwrap() + 20
            });
            handle2.await.unwrap() + 30
        });
        handle1.await.unwrap() + 40
    });

    assert_eq!(result, Ok(100));
}

#[test]
fn test_worker_threads_two_threads() {
    let rt = RuntimeBuilder::new().worker_threads(2).build().unwrap();

    let completed = Arc::new(Mutex::new(HashSet::new()));
    let completed_clone = completed.clone();

    rt.block_on(async move {
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let completed = completed_clone.clone();
                spawn(async move {
                    completed.lock().unwrap().insert(i);
                    i
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
    })
    .unwrap();

    let set = completed.lock().unwrap();
    assert_eq!(set.len(), 20);
    for i in 0..20 {
        assert!(set.contains(&i), "Task {} should have completed", i);
    }
}

#[test]
#[should_panic(expected = "worker_threads must be > 0")]
fn test_worker_threads_zero_panics() {
    let _ = RuntimeBuilder::new().worker_threads(0).build();
}

#[test]
fn test_worker_threads_sequential_runtimes() {
    for n in 1..=4 {
        let rt = RuntimeBuilder::new().worker_threads(n).build().unwrap();
        let result = rt.block_on(async move { n * 10 });
        assert_eq!(result, Ok(n * 10));
        drop(rt);
    }
}

#[test]
fn test_worker_threads_nested_spawns() {
    let rt = RuntimeBuilder::new().worker_threads(4).build().unwrap();

    let results = Arc::new(Mutex::new(Vec::new()));
    let results_clone = results.clone();

    rt.block_on(async move {
        let outer_handles: Vec<_> = (0..4)
            .map(|i| {
                let results = results_clone.clone();
                spawn(async move {
                    let inner_handles: Vec<_> = (0..5)
                        .map(|j| {
                            let results = results.clone();
                            spawn(async move {
                                results.lock().unwrap().push(i * 10 + j);
                            })
                        })
                        .collect();

                    for handle in inner_handles {
                        handle.await.unwrap();
                    }
                })
            })
            .collect();

        for handle in outer_handles {
            handle.await.unwrap();
        }
    })
    .unwrap();

    let final_results = results.lock().unwrap();
    assert_eq!(final_results.len(), 20);
}

#[test]
fn test_worker_threads_are_named() {
    let rt = RuntimeBuilder::new()
        .worker_threads(2)
        .thread_name("pool")
        .build()
        .unwrap();

    let name = rt
        .submit(|| thread::current().name().map(str::to_owned))
        .get()
        .unwrap()
        .unwrap();

    assert!(name.starts_with("pool-"), "unexpected worker name {name}");
}

#[test]
fn test_submit_panic_is_reported() {
    let rt = RuntimeBuilder::new().worker_threads(2).build().unwrap();

    let outcome = rt.submit(|| -> i32 { panic!("boom") }).get();
    assert_eq!(outcome, Err(TaskError::Panicked(String::from("boom"))));

    // The worker survived the panic.
    assert_eq!(rt.submit(|| 7).get(), Ok(7));
}

#[test]
fn test_then_receives_outcome() {
    let rt = RuntimeBuilder::new().worker_threads(2).build().unwrap();

    let first = rt.submit(|| 20);
    let chained = rt.then(first, |outcome| outcome.map(|v| v + 22));

    assert_eq!(chained.get(), Ok(Ok(42)));
}

#[test]
fn test_then_receives_panic() {
    let rt = RuntimeBuilder::new().worker_threads(2).build().unwrap();

    let failing = rt.submit(|| -> i32 { panic!("no value") });
    let chained = rt.then(failing, |outcome| outcome.is_err());

    assert_eq!(chained.get(), Ok(true));
}

#[test]
fn test_pool_future_then_inside_runtime() {
    let rt = RuntimeBuilder::new().worker_threads(2).build().unwrap();

    let result = rt.block_on(async {
        spawn(async { 5 })
            .then(|outcome| outcome.unwrap() * 2)
            .await
            .unwrap()
    });

    assert_eq!(result, Ok(10));
}

#[test]
fn test_when_all_keeps_input_order() {
    let rt = RuntimeBuilder::new().worker_threads(4).build().unwrap();

    let handles: Vec<_> = (0..5u64)
        .map(|i| {
            rt.submit(move || {
                thread::sleep(Duration::from_millis(10 * (5 - i)));
                i
            })
        })
        .collect();

    let outcomes = rt.block_on(hpyx::runtime::when_all(handles)).unwrap();

    assert_eq!(outcomes, vec![Ok(0), Ok(1), Ok(2), Ok(3), Ok(4)]);
}

#[test]
fn test_shutdown_drains_queued_work() {
    let rt = RuntimeBuilder::new().worker_threads(2).build().unwrap();
    let done = Arc::new(AtomicUsize::new(0));

    for _ in 0..50 {
        let done = done.clone();
        let _ = rt.submit(move || {
            thread::sleep(Duration::from_millis(1));
            done.fetch_add(1, Ordering::SeqCst);
        });
    }

    rt.shutdown();

    assert_eq!(done.load(Ordering::SeqCst), 50);
}

#[test]
fn test_submit_after_shutdown_is_abandoned() {
    let rt = RuntimeBuilder::new().worker_threads(1).build().unwrap();
    rt.shutdown();
    rt.shutdown();

    assert_eq!(rt.submit(|| 1).get(), Err(TaskError::Abandoned));
}

#[test]
fn test_pool_future_then_from_outside_runtime() {
    let rt = RuntimeBuilder::new().worker_threads(2).build().unwrap();

    let chained = rt.submit(|| 41).then(|outcome| outcome.map(|v| v + 1));

    assert_eq!(chained.get(), Ok(Ok(42)));
}

#[test]
fn test_pool_future_then_after_shutdown_is_abandoned() {
    let rt = RuntimeBuilder::new().worker_threads(1).build().unwrap();
    let first = rt.submit(|| 1);
    rt.shutdown();

    let chained = first.then(|outcome| outcome.is_ok());

    assert_eq!(chained.get(), Err(TaskError::Abandoned));
}

#[test]
fn test_compact_binding_runs_work() {
    let rt = RuntimeBuilder::new()
        .worker_threads(2)
        .bind(BindPolicy::Compact)
        .build()
        .unwrap();

    assert_eq!(rt.config().bind, BindPolicy::Compact);
    assert_eq!(rt.config().os_threads, 2);

    let handles: Vec<_> = (0..8).map(|i| rt.submit(move || i * i)).collect();
    let outcomes = rt.block_on(hpyx::runtime::when_all(handles)).unwrap();

    assert_eq!(outcomes, (0..8).map(|i| Ok(i * i)).collect::<Vec<_>>());
}
