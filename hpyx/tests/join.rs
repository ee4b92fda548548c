use hpyx::event_loop::spawn_local;
use hpyx::{RuntimeBuilder, join};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[hpyx::test]
async fn test_join_single_future() {
    let a = join!(async { 42 });

    assert_eq!(a, 42);
}

#[hpyx::test]
async fn test_join_two_futures() {
    let (a, b) = join!(async { 10 }, async { 20 });

    assert_eq!((a, b), (10, 20));
}

#[hpyx::test]
async fn test_join_three_futures() {
    let (a, b, c) = join!(async { "hello" }, async { 42 }, async { true });

    assert_eq!((a, b, c), ("hello", 42, true));
}

#[hpyx::test]
async fn test_join_with_trailing_comma() {
    let (a, b) = join!(async { 1 }, async { 2 },);

    assert_eq!(a + b, 3);
}

#[hpyx::test]
async fn test_join_local_tasks() {
    let (a, b) = join!(spawn_local(async { 40 }), spawn_local(async { 2 }));

    assert_eq!(a + b, 42);
}

#[test]
fn test_join_on_the_pool() {
    let rt = RuntimeBuilder::new().worker_threads(2).build().unwrap();

    let result = rt.block_on(async {
        let (num, text, v) = join!(async { 100i32 }, async { String::from("test") }, async {
            vec![1, 2, 3]
        });
        (num, text, v)
    });

    assert_eq!(result, Ok((100, String::from("test"), vec![1, 2, 3])));
}

#[test]
fn test_join_concurrent_execution() {
    let rt = RuntimeBuilder::new().worker_threads(4).build().unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    let c1 = counter.clone();
    let c2 = counter.clone();
    let c3 = counter.clone();

    rt.block_on(async move {
        join!(
            async move {
                c1.fetch_add(1, Ordering::SeqCst);
            },
            async move {
                c2.fetch_add(10, Ordering::SeqCst);
            },
            async move {
                c3.fetch_add(100, Ordering::SeqCst);
            }
        );
    })
    .unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 111);
}

#[hpyx::test]
async fn test_join_with_captured_values() {
    let value = 50;
    let multiplier = 2;

    let (a, b) = join!(async move { value * multiplier }, async move {
        value + multiplier
    });

    assert_eq!((a, b), (100, 52));
}

#[hpyx::test]
async fn test_join_with_result_types() {
    let (ok_result, err_result) = join!(async { Ok::<i32, &str>(100) }, async {
        Err::<i32, &str>("error")
    });

    assert_eq!(ok_result, Ok(100));
    assert_eq!(err_result, Err("error"));
}
