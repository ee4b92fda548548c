use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Wraps `future` so that it resolves to `(output, elapsed)`.
///
/// Timing starts on the **first poll**, not at construction time.
///
/// # Examples
///
/// ```rust,ignore
/// let (result, waited) = instrumented(handle).await;
/// tracing::info!(?waited, "handle resolved");
/// ```
pub fn instrumented<F: Future>(future: F) -> Instrumented<F> {
    Instrumented {
        future,
        start: None,
    }
}

/// Future returned by [`instrumented`].
pub struct Instrumented<F> {
    future: F,

    /// Set on first poll.
    start: Option<Instant>,
}

impl<F: Future> Future for Instrumented<F> {
    type Output = (F::Output, Duration);

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // Safety: `future` is never moved out of `self`; `start` is `Unpin`.
        let this = unsafe { self.get_unchecked_mut() };

        let start = *this.start.get_or_insert_with(Instant::now);
        let future = unsafe { Pin::new_unchecked(&mut this.future) };

        future.poll(cx).map(|output| (output, start.elapsed()))
    }
}
