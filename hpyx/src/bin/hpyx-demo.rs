use hpyx::DispatchError;
use hpyx::demo::{launch_and_await, slow_task};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[hpyx::main]
async fn main() -> Result<(), DispatchError> {
    init_tracing();

    // The launch diagnostics are logged by `launch_and_await` before it
    // suspends; only the outcome is printed here.
    let report = launch_and_await(slow_task).await?;

    println!("Result = {}", report.result);
    println!(
        "Waited {:.3} seconds for the result",
        report.wait_elapsed.as_secs_f64()
    );

    println!("Final result: {}", report.result);
    Ok(())
}
