//! Five-field cron expressions: `minute hour day-of-month month day-of-week`.
//!
//! Each field accepts `*`, a number, a comma list, a range `a-b`, and an
//! optional `/step` on any of those. Day-of-week runs 0–7 with both 0 and 7
//! meaning Sunday. When day-of-month and day-of-week are both restricted,
//! a day matching either fires (the classic vixie-cron OR rule).

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};

use crate::error::{Result, SchedulerError};

/// Search bound for the next fire time: a leap year of minutes. An
/// expression that cannot match within that window (e.g. February 31st)
/// yields `None` instead of spinning forever.
const SEARCH_LIMIT_MINUTES: i64 = 366 * 24 * 60;

/// A parsed cron expression, matched minute-by-minute in UTC.
#[derive(Debug, Clone)]
pub struct CronSchedule {
    minutes: Vec<bool>,  // 0–59
    hours: Vec<bool>,    // 0–23
    days: Vec<bool>,     // 1–31 (index 0 unused)
    months: Vec<bool>,   // 1–12 (index 0 unused)
    weekdays: Vec<bool>, // 0–6, Sunday = 0
    any_day: bool,
    any_weekday: bool,
}

impl CronSchedule {
    pub fn parse(expression: &str) -> Result<Self> {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(SchedulerError::InvalidSchedule(format!(
                "expected 5 fields, got {} in {expression:?}",
                fields.len()
            )));
        }

        let minutes = parse_field(fields[0], 0, 59)?;
        let hours = parse_field(fields[1], 0, 23)?;
        let days = parse_field(fields[2], 1, 31)?;
        let months = parse_field(fields[3], 1, 12)?;
        let mut weekdays = parse_field(fields[4], 0, 7)?;

        // 7 is an alias for Sunday.
        if weekdays[7] {
            weekdays[0] = true;
        }
        weekdays.truncate(7);

        Ok(Self {
            any_day: fields[2] == "*",
            any_weekday: fields[4] == "*",
            minutes,
            hours,
            days,
            months,
            weekdays,
        })
    }

    /// True when the instant (truncated to the minute) matches.
    pub fn matches(&self, t: DateTime<Utc>) -> bool {
        if !self.minutes[t.minute() as usize]
            || !self.hours[t.hour() as usize]
            || !self.months[t.month() as usize]
        {
            return false;
        }

        let day_ok = self.days[t.day() as usize];
        let weekday_ok = self.weekdays[t.weekday().num_days_from_sunday() as usize];

        match (self.any_day, self.any_weekday) {
            (true, true) => true,
            (true, false) => weekday_ok,
            (false, true) => day_ok,
            // Both restricted: either one fires.
            (false, false) => day_ok || weekday_ok,
        }
    }

    /// First matching minute strictly after `from`, or `None` when nothing
    /// matches within [`SEARCH_LIMIT_MINUTES`].
    pub fn next_fire(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut t = (from + Duration::minutes(1))
            .with_second(0)?
            .with_nanosecond(0)?;

        for _ in 0..SEARCH_LIMIT_MINUTES {
            if self.matches(t) {
                return Some(t);
            }
            t += Duration::minutes(1);
        }
        None
    }
}

/// Parse one field into a membership table over `min..=max`.
fn parse_field(spec: &str, min: u32, max: u32) -> Result<Vec<bool>> {
    let mut set = vec![false; (max + 1) as usize];

    for term in spec.split(',') {
        let (range, step) = match term.split_once('/') {
            Some((range, step)) => {
                let step: u32 = step.parse().map_err(|_| {
                    SchedulerError::InvalidSchedule(format!("bad step in {term:?}"))
                })?;
                if step == 0 {
                    return Err(SchedulerError::InvalidSchedule(format!(
                        "zero step in {term:?}"
                    )));
                }
                (range, step)
            }
            None => (term, 1),
        };

        let (lo, hi) = if range == "*" {
            (min, max)
        } else if let Some((a, b)) = range.split_once('-') {
            (parse_value(a)?, parse_value(b)?)
        } else {
            let v = parse_value(range)?;
            (v, v)
        };

        if lo < min || hi > max || lo > hi {
            return Err(SchedulerError::InvalidSchedule(format!(
                "value out of range in {term:?} (allowed {min}-{max})"
            )));
        }

        let mut v = lo;
        while v <= hi {
            set[v as usize] = true;
            v += step;
        }
    }

    Ok(set)
}

fn parse_value(s: &str) -> Result<u32> {
    s.parse()
        .map_err(|_| SchedulerError::InvalidSchedule(format!("not a number: {s:?}")))
}
