//! Small sample operations, handy for checking that the runtime is alive.

use crate::error::DispatchError;
use crate::runtime::global::global_or_init;

/// Adds two integers on the calling thread.
pub fn add(a: i64, b: i64) -> i64 {
    a + b
}

/// Prints a greeting and returns `0`.
pub fn hello() -> i32 {
    tracing::debug!("saying hello");
    println!("Hello World!");
    0
}

/// Adds two integers on the global runtime and blocks until the sum is
/// available.
///
/// Starts the global runtime if needed.
pub fn async_add(a: i64, b: i64) -> Result<i64, DispatchError> {
    let runtime = global_or_init()?;

    let sum = runtime.submit(move || add(a, b));
    tracing::info!("calling async(add, {a}, {b})");

    let sum = sum.get()?;
    tracing::info!("which returned: {sum}");

    Ok(sum)
}
