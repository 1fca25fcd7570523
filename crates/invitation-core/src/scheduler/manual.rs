//! Virtual-time scheduler.
//!
//! Time stands still until [`ManualScheduler::advance`] is called, which
//! runs every task falling due in the window in due-time order. The
//! scheduler doubles as the [`Clock`], so engines that read "now" while
//! running a task see the task's due time.

use std::cell::RefCell;
use std::time::Duration;

use super::{OnceTask, RepeatTask, Scheduler, TaskHandle};
use crate::clock::Clock;

enum Job {
    Once(OnceTask),
    Every { period_ms: i64, task: RepeatTask },
}

struct Entry {
    due_ms: i64,
    /// Registration order; breaks ties between tasks due at the same instant.
    seq: u64,
    handle: TaskHandle,
    job: Job,
}

struct Queue {
    now_ms: i64,
    next_seq: u64,
    entries: Vec<Entry>,
}

pub struct ManualScheduler {
    queue: RefCell<Queue>,
}

impl ManualScheduler {
    pub fn new(start_ms: i64) -> Self {
        Self {
            queue: RefCell::new(Queue {
                now_ms: start_ms,
                next_seq: 0,
                entries: Vec::new(),
            }),
        }
    }

    /// Number of live (not cancelled) tasks.
    pub fn pending(&self) -> usize {
        self.queue
            .borrow()
            .entries
            .iter()
            .filter(|e| !e.handle.is_cancelled())
            .count()
    }

    /// Move time forward by `by`, running every task that falls due.
    /// Returns how many task runs happened.
    pub fn advance(&self, by: Duration) -> usize {
        let until = self.now_ms().saturating_add(duration_ms(by));
        let mut runs = 0;

        loop {
            // The borrow must end before the task runs: tasks schedule and
            // cancel other tasks.
            let next = {
                let mut queue = self.queue.borrow_mut();
                queue.entries.retain(|e| !e.handle.is_cancelled());
                let idx = queue
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.due_ms <= until)
                    .min_by_key(|(_, e)| (e.due_ms, e.seq))
                    .map(|(i, _)| i);
                match idx {
                    Some(i) => {
                        let entry = queue.entries.swap_remove(i);
                        queue.now_ms = entry.due_ms;
                        entry
                    }
                    None => break,
                }
            };

            let Entry {
                due_ms,
                seq,
                handle,
                job,
            } = next;
            runs += 1;
            match job {
                Job::Once(task) => task(),
                Job::Every {
                    period_ms,
                    mut task,
                } => {
                    task();
                    if !handle.is_cancelled() {
                        self.queue.borrow_mut().entries.push(Entry {
                            due_ms: due_ms + period_ms,
                            seq,
                            handle,
                            job: Job::Every { period_ms, task },
                        });
                    }
                }
            }
        }

        self.queue.borrow_mut().now_ms = until;
        runs
    }

    fn push(&self, delay: Duration, job: Job) -> TaskHandle {
        let handle = TaskHandle::new();
        let mut queue = self.queue.borrow_mut();
        let seq = queue.next_seq;
        queue.next_seq += 1;
        let due_ms = queue.now_ms.saturating_add(duration_ms(delay));
        queue.entries.push(Entry {
            due_ms,
            seq,
            handle: handle.clone(),
            job,
        });
        handle
    }
}

impl Clock for ManualScheduler {
    fn now_ms(&self) -> i64 {
        self.queue.borrow().now_ms
    }
}

impl Scheduler for ManualScheduler {
    fn every(&self, period: Duration, task: RepeatTask) -> TaskHandle {
        // A zero period would never let time move forward.
        let period_ms = duration_ms(period).max(1);
        self.push(
            Duration::from_millis(period_ms as u64),
            Job::Every { period_ms, task },
        )
    }

    fn after(&self, delay: Duration, task: OnceTask) -> TaskHandle {
        self.push(delay, Job::Once(task))
    }
}

fn duration_ms(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
