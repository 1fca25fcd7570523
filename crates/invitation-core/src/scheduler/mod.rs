//! Cancelable task scheduling on a single-threaded host.
//!
//! The page runs every callback on one event thread, one at a time. Tasks
//! are therefore plain `!Send` closures, and cancellation is a shared flag
//! checked right before a task would run.

mod local;
mod manual;

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

pub use local::LocalScheduler;
pub use manual::ManualScheduler;

/// Nominal animation-frame interval (60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub type OnceTask = Box<dyn FnOnce()>;
pub type RepeatTask = Box<dyn FnMut()>;

/// Host timer facility.
pub trait Scheduler {
    /// Run `task` every `period`, first one full period after registration.
    fn every(&self, period: Duration, task: RepeatTask) -> TaskHandle;

    /// Run `task` once after `delay`.
    fn after(&self, delay: Duration, task: OnceTask) -> TaskHandle;

    /// Run `task` before the next repaint.
    fn next_frame(&self, task: OnceTask) -> TaskHandle {
        self.after(FRAME_INTERVAL, task)
    }
}

/// Handle to a scheduled task. Clones share the same cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prevent any further run of the task. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}
