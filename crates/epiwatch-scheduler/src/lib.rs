//! `epiwatch-scheduler` — cron-pattern trigger for the daily digest.
//!
//! [`cron::CronSchedule`] parses a five-field cron expression and computes
//! fire times in UTC; [`trigger::ScheduleTrigger`] sleeps until the next
//! fire and emits a tick over an mpsc channel, repeating until shutdown.

pub mod cron;
pub mod error;
pub mod trigger;

pub use cron::CronSchedule;
pub use error::{Result, SchedulerError};
pub use trigger::ScheduleTrigger;
