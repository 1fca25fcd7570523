//! Real-time scheduler on a tokio `LocalSet`.
//!
//! Tasks are spawned with [`tokio::task::spawn_local`], so every method must
//! be called from inside a running `LocalSet`; they panic otherwise.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

use super::{OnceTask, RepeatTask, Scheduler, TaskHandle};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalScheduler;

impl Scheduler for LocalScheduler {
    fn every(&self, period: Duration, mut task: RepeatTask) -> TaskHandle {
        let period = period.max(Duration::from_millis(1));
        let handle = TaskHandle::new();
        let guard = handle.clone();
        tokio::task::spawn_local(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if guard.is_cancelled() {
                    break;
                }
                task();
            }
        });
        handle
    }

    fn after(&self, delay: Duration, task: OnceTask) -> TaskHandle {
        let handle = TaskHandle::new();
        let guard = handle.clone();
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if !guard.is_cancelled() {
                task();
            }
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[tokio::test(start_paused = true)]
    async fn after_runs_once_unless_cancelled() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let fired = Rc::new(Cell::new(0));
                let f = fired.clone();
                LocalScheduler.after(
                    Duration::from_millis(300),
                    Box::new(move || f.set(f.get() + 1)),
                );
                let f = fired.clone();
                let cancelled = LocalScheduler.after(
                    Duration::from_millis(300),
                    Box::new(move || f.set(f.get() + 10)),
                );
                cancelled.cancel();

                tokio::time::sleep(Duration::from_millis(500)).await;
                assert_eq!(fired.get(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn every_stops_after_cancel() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let count = Rc::new(Cell::new(0));
                let c = count.clone();
                let handle = LocalScheduler.every(
                    Duration::from_secs(1),
                    Box::new(move || c.set(c.get() + 1)),
                );

                tokio::time::sleep(Duration::from_millis(3_500)).await;
                assert_eq!(count.get(), 3);

                handle.cancel();
                tokio::time::sleep(Duration::from_secs(3)).await;
                assert_eq!(count.get(), 3);
            })
            .await;
    }
}
