// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use schedule_cell::{ScheduleError, SlotTime};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time_of_day: SlotTime,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub is_first_visit: bool,
    pub client_id: i64,
    /// Always `None` for a first visit.
    pub pet_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Cancelled appointments free their slot.
    pub fn occupies_slot(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

impl AppointmentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::Completed)
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveAppointmentRequest {
    pub date: NaiveDate,
    #[serde(alias = "time")]
    pub time_of_day: SlotTime,
    pub client_id: i64,
    #[serde(default)]
    pub pet_id: Option<i64>,
    #[serde(default)]
    pub is_first_visit: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// `?date=YYYY-MM-DD`, kept as raw text so a malformed value yields no slots
/// instead of a rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentsByDateQuery {
    pub date: NaiveDate,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Client {0} not found")]
    ClientNotFound(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Slot {time_of_day} on {date} is already taken")]
    SlotTaken { date: NaiveDate, time_of_day: SlotTime },

    #[error("Appointment cannot move from {from} to {to}")]
    InvalidStatusTransition { from: AppointmentStatus, to: AppointmentStatus },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<ScheduleError> for AppointmentError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::Configuration(msg) => AppointmentError::ConfigurationError(msg),
            ScheduleError::InvalidTime(msg) => AppointmentError::ValidationError(format!("invalid time of day: {}", msg)),
            ScheduleError::DatabaseError(msg) => AppointmentError::DatabaseError(msg),
        }
    }
}
