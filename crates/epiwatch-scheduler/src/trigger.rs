//! Trigger loop: sleep until the next cron fire, emit a tick, repeat.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::cron::CronSchedule;

/// Drives scheduled digest runs.
///
/// Each fire is emitted over the tick channel with `try_send`, so a slow
/// consumer can never stall the loop — a still-unconsumed previous tick
/// means this one is dropped and logged.
pub struct ScheduleTrigger {
    schedule: CronSchedule,
    tick_tx: mpsc::Sender<DateTime<Utc>>,
}

impl ScheduleTrigger {
    pub fn new(schedule: CronSchedule, tick_tx: mpsc::Sender<DateTime<Utc>>) -> Self {
        Self { schedule, tick_tx }
    }

    /// Run until `shutdown` flips to `true` or the schedule is exhausted.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("schedule trigger started");
        loop {
            let now = Utc::now();
            let Some(next) = self.schedule.next_fire(now) else {
                warn!("cron pattern never fires again, trigger exiting");
                break;
            };

            let wait = (next - now).to_std().unwrap_or_default();
            info!(next = %next.to_rfc3339(), "next digest scheduled");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    if self.tick_tx.try_send(next).is_err() {
                        warn!("tick channel full or closed, digest run dropped");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("schedule trigger shutting down");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_stops_the_loop_before_the_fire() {
        let cron = CronSchedule::parse("0 9 * * *").unwrap();
        let (tick_tx, mut tick_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let trigger = ScheduleTrigger::new(cron, tick_tx);
        let handle = tokio::spawn(trigger.run(shutdown_rx));

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        // Sender dropped with the trigger, no tick was emitted.
        assert!(tick_rx.recv().await.is_none());
    }
}
