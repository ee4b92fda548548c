use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Completes on its second poll, waking itself after the first.
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.yielded {
            return Poll::Ready(());
        }

        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Yields once to whichever scheduler is driving the current task.
///
/// Works on both the event loop and the pool: on the loop it lets other
/// local tasks and pending callbacks run; on the pool it re-queues the
/// task behind the work already waiting.
///
/// # Examples
///
/// ```rust,ignore
/// async fn cooperative() {
///     for chunk in work {
///         process(chunk);
///         yield_now().await;
///     }
/// }
/// ```
pub async fn yield_now() {
    YieldOnce { yielded: false }.await
}
