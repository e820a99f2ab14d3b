//! Coalescing wake signal raised from interrupt context

use core::future::poll_fn;
use core::task::Poll;

use embassy_sync::waitqueue::AtomicWaker;
use portable_atomic::{AtomicBool, Ordering};

/// One-bit "data is ready" notification
///
/// [`raise`](Self::raise) never blocks and is safe from interrupt
/// handlers. Any number of raises before the next take count as one.
/// A raise with no waiter is latched until consumed.
pub struct WakeSignal {
    pending: AtomicBool,
    waker: AtomicWaker,
}

impl WakeSignal {
    /// Cleared signal, usable in a `static`
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            waker: AtomicWaker::new(),
        }
    }

    /// Set the bit and wake the waiter, if any
    pub fn raise(&self) {
        self.pending.store(true, Ordering::Release);
        self.waker.wake();
    }

    /// Consume the bit without waiting
    pub fn try_take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Check the bit without consuming it
    pub fn is_raised(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Wait for the bit, then clear it
    pub async fn wait(&self) {
        poll_fn(|cx| {
            self.waker.register(cx.waker());
            if self.try_take() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }
}

impl Default for WakeSignal {
    fn default() -> Self {
        Self::new()
    }
}
