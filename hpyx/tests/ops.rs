use hpyx::ops::{add, async_add, hello};

#[test]
fn test_add() {
    assert_eq!(add(2, 3), 5);
    assert_eq!(add(-4, 4), 0);
}

#[test]
fn test_hello_returns_zero() {
    assert_eq!(hello(), 0);
}

#[test]
fn test_async_add_uses_global_runtime() {
    assert_eq!(async_add(40, 2).unwrap(), 42);
    assert!(hpyx::runtime::is_running());
}
