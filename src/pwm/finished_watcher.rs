use core::{
    cell::RefCell,
    pin::Pin,
    task::{Context, Poll, Waker},
};

use critical_section::Mutex;
use futures::Future;

use super::status::{Flags, SharedStatus};

/// Wakes a task once the state machine halted the stream.
pub(crate) struct FinishedWatcher {
    waker: Mutex<RefCell<Option<Waker>>>,
}

impl FinishedWatcher {
    pub const fn new() -> Self {
        Self {
            waker: Mutex::new(RefCell::new(None)),
        }
    }

    /// Called from interrupt context, after the flags got cleared.
    pub fn notify(&self) {
        critical_section::with(|cs| {
            if let Some(waker) = self.waker.borrow(cs).borrow_mut().take() {
                waker.wake();
            }
        });
    }

    fn register(&self, cs: critical_section::CriticalSection, new_waker: &Waker) {
        let mut waker = self.waker.borrow(cs).borrow_mut();

        // From embassy
        // https://github.com/embassy-rs/embassy/blob/b99533607ceed225dd12ae73aaa9a0d969a7365e/embassy-sync/src/waitqueue/waker.rs#L59-L61
        match waker.as_ref() {
            // Both wakers wake the same task; skip the clone.
            Some(w2) if w2.will_wake(new_waker) => {}
            _ => {
                // We had a waker registered for another task. Wake it, so the other task can
                // reregister itself if it's still interested.
                if let Some(old_waker) = waker.replace(new_waker.clone()) {
                    old_waker.wake()
                }
            }
        }
    }
}

impl core::fmt::Debug for FinishedWatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FinishedWatcher").finish_non_exhaustive()
    }
}

/// Resolves once no transmission is in flight.
///
/// Created by [LedStrip::transmission_finished](crate::LedStrip::transmission_finished).
#[derive(Debug)]
pub struct TransmissionFinished<'a> {
    status: &'a SharedStatus,
    watcher: &'a FinishedWatcher,
}

impl<'a> TransmissionFinished<'a> {
    pub(crate) fn new(status: &'a SharedStatus, watcher: &'a FinishedWatcher) -> Self {
        Self { status, watcher }
    }
}

impl Future for TransmissionFinished<'_> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        critical_section::with(|cs| {
            if self.status.flags().contains(Flags::UPDATING) {
                self.watcher.register(cs, cx.waker());
                Poll::Pending
            } else {
                Poll::Ready(())
            }
        })
    }
}
