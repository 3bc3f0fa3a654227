// libs/schedule-cell/src/models.rs
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveTime, Timelike, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

// ==============================================================================
// TIME OF DAY
// ==============================================================================

/// A time of day at minute precision, written as `HH:MM`.
///
/// Seconds are dropped on construction so that a stored `08:20:00` and a
/// generated `08:20` are the same slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    pub fn new(time: NaiveTime) -> Self {
        let truncated = time
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(time);
        Self(truncated)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// Steps forward, returning `None` instead of wrapping past midnight.
    pub fn checked_add_minutes(self, minutes: i64) -> Option<Self> {
        let (next, wrapped_secs) = self.0.overflowing_add_signed(Duration::minutes(minutes));
        if wrapped_secs != 0 {
            None
        } else {
            Some(Self(next))
        }
    }
}

impl From<NaiveTime> for SlotTime {
    fn from(time: NaiveTime) -> Self {
        Self::new(time)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for SlotTime {
    type Err = ScheduleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
            .map(Self::new)
            .ok_or_else(|| ScheduleError::InvalidTime(raw.to_string()))
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

// ==============================================================================
// SCHEDULE CONFIGURATION
// ==============================================================================

/// Opening window for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub weekday: Weekday,
    pub is_active: bool,
    #[serde(default)]
    pub start_time: Option<SlotTime>,
    #[serde(default)]
    pub end_time: Option<SlotTime>,
}

impl DayHours {
    pub fn active(weekday: Weekday, start_time: SlotTime, end_time: SlotTime) -> Self {
        Self {
            weekday,
            is_active: true,
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }

    pub fn inactive(weekday: Weekday) -> Self {
        Self {
            weekday,
            is_active: false,
            start_time: None,
            end_time: None,
        }
    }

    /// `(start, end)` when the day is open and both bounds are set.
    pub fn window(&self) -> Option<(SlotTime, SlotTime)> {
        if !self.is_active {
            return None;
        }
        Some((self.start_time?, self.end_time?))
    }
}

/// The clinic-wide consult schedule. One record per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleConfigurationRecord", into = "ScheduleConfigurationRecord")]
pub struct ScheduleConfiguration {
    consult_duration_minutes: i32,
    days: [Option<DayHours>; 7],
}

/// Wire and storage shape of [`ScheduleConfiguration`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfigurationRecord {
    pub consult_duration_minutes: i32,
    #[serde(default)]
    pub days: Vec<DayHours>,
}

impl ScheduleConfiguration {
    pub fn new(consult_duration_minutes: i32) -> Self {
        Self {
            consult_duration_minutes,
            days: Default::default(),
        }
    }

    pub fn with_day(mut self, hours: DayHours) -> Self {
        self.set_day(hours);
        self
    }

    /// Replaces whatever was configured for `hours.weekday`.
    pub fn set_day(&mut self, hours: DayHours) {
        let index = hours.weekday.num_days_from_monday() as usize;
        self.days[index] = Some(hours);
    }

    pub fn day(&self, weekday: Weekday) -> Option<&DayHours> {
        self.days[weekday.num_days_from_monday() as usize].as_ref()
    }

    /// Configured days, Monday first.
    pub fn days(&self) -> impl Iterator<Item = &DayHours> {
        self.days.iter().flatten()
    }

    pub fn consult_duration_minutes(&self) -> i32 {
        self.consult_duration_minutes
    }

    /// Strict checks applied before a configuration is saved.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.consult_duration_minutes <= 0 {
            return Err(ScheduleError::Configuration(format!(
                "consult duration must be positive, got {}",
                self.consult_duration_minutes
            )));
        }

        for hours in self.days().filter(|h| h.is_active) {
            match (hours.start_time, hours.end_time) {
                (Some(start), Some(end)) if start < end => {}
                (Some(start), Some(end)) => {
                    return Err(ScheduleError::Configuration(format!(
                        "{} opens at {} but closes at {}",
                        hours.weekday, start, end
                    )));
                }
                _ => {
                    return Err(ScheduleError::Configuration(format!(
                        "{} is active but has no opening hours",
                        hours.weekday
                    )));
                }
            }
        }

        Ok(())
    }
}

impl TryFrom<ScheduleConfigurationRecord> for ScheduleConfiguration {
    type Error = ScheduleError;

    fn try_from(record: ScheduleConfigurationRecord) -> Result<Self, Self::Error> {
        let mut config = ScheduleConfiguration::new(record.consult_duration_minutes);
        for hours in record.days {
            if config.day(hours.weekday).is_some() {
                return Err(ScheduleError::Configuration(format!(
                    "{} is configured more than once",
                    hours.weekday
                )));
            }
            config.set_day(hours);
        }
        Ok(config)
    }
}

impl From<ScheduleConfiguration> for ScheduleConfigurationRecord {
    fn from(config: ScheduleConfiguration) -> Self {
        Self {
            consult_duration_minutes: config.consult_duration_minutes,
            days: config.days.into_iter().flatten().collect(),
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
