//! Flow state locking and cancellation cleanup.
//!
//! Flow state sits behind a std `Mutex` that is only ever held for short,
//! await-free sections, so a dropped submission can still be rolled back
//! from `Drop`.

use std::sync::{Mutex, MutexGuard, PoisonError};

pub(crate) fn lock_state<S>(state: &Mutex<S>) -> MutexGuard<'_, S> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Armed while a submission is outstanding. If the owning future is dropped
/// before `disarm`, the cancel hook runs under the state lock.
///
/// Must not be dropped while the same thread holds the state lock.
pub(crate) struct InFlightGuard<'a, S> {
    state: &'a Mutex<S>,
    on_cancel: fn(&mut S),
    armed: bool,
}

impl<'a, S> InFlightGuard<'a, S> {
    pub(crate) fn arm(state: &'a Mutex<S>, on_cancel: fn(&mut S)) -> Self {
        Self {
            state,
            on_cancel,
            armed: true,
        }
    }

    pub(crate) fn disarm(mut self) {
        self.armed = false;
    }
}

impl<S> Drop for InFlightGuard<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            (self.on_cancel)(&mut lock_state(self.state));
        }
    }
}
