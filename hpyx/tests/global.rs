use hpyx::runtime::{handle, init_runtime, is_running, stop_runtime};
use hpyx::{ConfigError, RuntimeConfig, RuntimeError, init_runtime_with};
use std::sync::Mutex;

// Every test in this binary shares the process-wide runtime.
static SERIAL: Mutex<()> = Mutex::new(());

#[test]
fn test_init_and_stop() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    stop_runtime();

    assert!(matches!(handle(), Err(RuntimeError::NotRunning)));

    init_runtime(["hpyx.os_threads=3"]).unwrap();
    assert!(is_running());
    assert_eq!(handle().unwrap().workers(), 3);

    stop_runtime();
    assert!(!is_running());
    assert!(matches!(handle(), Err(RuntimeError::NotRunning)));

    // Stopping twice is a no-op.
    stop_runtime();
}

#[test]
fn test_init_is_idempotent() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    stop_runtime();

    init_runtime(["hpyx.os_threads=2"]).unwrap();
    init_runtime(["hpyx.os_threads=8"]).unwrap();
    init_runtime_with(RuntimeConfig::default()).unwrap();

    assert_eq!(handle().unwrap().workers(), 2);

    stop_runtime();
}

#[test]
fn test_init_rejects_bad_entries() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    stop_runtime();

    let err = init_runtime(["hpyx.os_threads"]).unwrap_err();
    assert!(matches!(err, RuntimeError::Config(ConfigError::InvalidEntry(_))));

    let err = init_runtime(["hpyx.colour=blue"]).unwrap_err();
    assert!(matches!(err, RuntimeError::Config(ConfigError::UnknownKey(_))));

    assert!(!is_running());
}

#[test]
fn test_restart_after_stop() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    stop_runtime();

    init_runtime(["hpyx.os_threads=1"]).unwrap();
    let old = handle().unwrap();
    stop_runtime();

    // The old handle no longer accepts work.
    assert_eq!(old.submit(|| 1).get(), Err(hpyx::TaskError::Abandoned));

    init_runtime(["hpyx.os_threads=2"]).unwrap();
    assert_eq!(handle().unwrap().submit(|| 2).get(), Ok(2));

    stop_runtime();
}
