use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;

use crate::clock::FixedClock;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub clinic_timezone: Tz,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            clinic_timezone: Tz::UTC,
        }
    }
}

impl TestConfig {
    /// Config pointing at a wiremock server.
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            clinic_timezone: self.clinic_timezone,
            port: 3000,
        }
    }
}

/// Builds a `NaiveDateTime` from "YYYY-MM-DD" and "HH:MM".
pub fn local_datetime(date: &str, time: &str) -> NaiveDateTime {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid test date");
    let time = NaiveTime::parse_from_str(time, "%H:%M").expect("valid test time");
    date.and_time(time)
}

pub fn fixed_clock(date: &str, time: &str) -> FixedClock {
    FixedClock::new(local_datetime(date, time))
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn schedule_response(duration: i32, days: serde_json::Value) -> serde_json::Value {
        json!({
            "id": 1,
            "consult_duration_minutes": duration,
            "days": days,
            "updated_at": "2025-01-01T00:00:00Z"
        })
    }

    pub fn day_hours(weekday: &str, start: &str, end: &str) -> serde_json::Value {
        json!({
            "weekday": weekday,
            "is_active": true,
            "start_time": start,
            "end_time": end
        })
    }

    pub fn inactive_day(weekday: &str) -> serde_json::Value {
        json!({
            "weekday": weekday,
            "is_active": false,
            "start_time": null,
            "end_time": null
        })
    }

    pub fn appointment_response(date: &str, time_of_day: &str, status: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "date": date,
            "time_of_day": time_of_day,
            "status": status,
            "reason": null,
            "is_first_visit": false,
            "client_id": 1,
            "pet_id": 7,
            "created_at": "2025-01-01T00:00:00Z"
        })
    }

    pub fn client_response(client_id: i64) -> serde_json::Value {
        json!({ "id": client_id })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
