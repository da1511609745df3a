//! Debounce gate
//!
//! One pending timer per renderer. Scheduling again replaces the pending
//! action; dropping the stored task cancels its timer.

use std::cell::RefCell;
use std::time::Duration;

use smol::{LocalExecutor, Task, Timer};

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: RefCell<Option<Task<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: RefCell::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `action` once `delay` has passed without another call
    pub fn schedule<F>(&self, executor: &LocalExecutor<'static>, action: F)
    where
        F: FnOnce() + 'static,
    {
        let delay = self.delay;
        let task = executor.spawn(async move {
            Timer::after(delay).await;
            action();
        });
        // Replacing the previous task drops and cancels it.
        self.pending.replace(Some(task));
    }

    /// Cancel the pending action; returns whether one was waiting
    pub fn cancel(&self) -> bool {
        self.pending
            .take()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .borrow()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}
