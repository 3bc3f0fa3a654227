// libs/schedule-cell/src/services/slots.rs
use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::models::{ScheduleConfiguration, ScheduleError, SlotTime};

/// Candidate consult times for one date, ascending, over `[start, end)`.
///
/// Lazy and `Clone`, so a caller can restart the sequence by cloning it
/// before consuming.
#[derive(Debug, Clone)]
pub struct Slots {
    next: Option<SlotTime>,
    end: SlotTime,
    step_minutes: i64,
}

impl Slots {
    pub fn empty() -> Self {
        Self {
            next: None,
            end: SlotTime::default(),
            step_minutes: 1,
        }
    }
}

impl Iterator for Slots {
    type Item = SlotTime;

    fn next(&mut self) -> Option<SlotTime> {
        let current = self.next?;
        if current >= self.end {
            self.next = None;
            return None;
        }
        self.next = current.checked_add_minutes(self.step_minutes);
        Some(current)
    }
}

impl FusedIterator for Slots {}

/// Produces the raw slots for `date` from the weekday's opening window.
///
/// A closed, missing or half-configured day gives an empty sequence. A
/// non-positive consult duration is a configuration error.
pub fn generate(config: &ScheduleConfiguration, date: NaiveDate) -> Result<Slots, ScheduleError> {
    let duration = config.consult_duration_minutes();
    if duration <= 0 {
        return Err(ScheduleError::Configuration(format!(
            "consult duration must be positive, got {}",
            duration
        )));
    }

    let weekday = date.weekday();
    let Some((start, end)) = config.day(weekday).and_then(|hours| hours.window()) else {
        debug!("No opening hours for {} ({})", date, weekday);
        return Ok(Slots::empty());
    };

    Ok(Slots {
        next: Some(start),
        end,
        step_minutes: i64::from(duration),
    })
}
