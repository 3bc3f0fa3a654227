// libs/appointment-cell/src/store/supabase.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::{StoreError, SupabaseClient};

use crate::models::{Appointment, AppointmentStatus};
use crate::store::AppointmentStore;

/// PostgREST-backed store.
///
/// Double bookings are refused by a partial unique index on
/// `appointments (date, time_of_day) WHERE status <> 'cancelled'`, which
/// PostgREST reports as HTTP 409.
pub struct SupabaseAppointmentStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    fn parse_rows(rows: Vec<Value>) -> Result<Vec<Appointment>, StoreError> {
        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| StoreError::Decode(format!("Failed to parse appointments: {}", e)))
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn client_exists(&self, client_id: i64) -> Result<bool, StoreError> {
        let path = format!("/rest/v1/clients?id=eq.{}&select=id", client_id);
        let result: Vec<Value> = self.supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(StoreError::from_backend)?;

        Ok(!result.is_empty())
    }

    async fn appointments_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, StoreError> {
        let path = format!(
            "/rest/v1/appointments?date=eq.{}&order=time_of_day.asc",
            date.format("%Y-%m-%d")
        );

        let result: Vec<Value> = self.supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(StoreError::from_backend)?;

        debug!("Loaded {} appointments for {}", result.len(), date);
        Self::parse_rows(result)
    }

    async fn insert(&self, appointment: &Appointment) -> Result<(), StoreError> {
        let body = serde_json::to_value(appointment)?;

        let _: Vec<Value> = self.supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(body),
                Some(SupabaseClient::return_representation()),
            )
            .await
            .map_err(StoreError::from_backend)?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let result: Vec<Value> = self.supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(StoreError::from_backend)?;

        Ok(Self::parse_rows(result)?.into_iter().next())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, StoreError> {
        // The status filter makes the PATCH a compare-and-set; an empty
        // representation means another writer got there first.
        let path = format!("/rest/v1/appointments?id=eq.{}&status=eq.{}", id, expected);
        let result: Vec<Value> = self.supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(json!({ "status": status })),
                Some(SupabaseClient::return_representation()),
            )
            .await
            .map_err(StoreError::from_backend)?;

        Ok(Self::parse_rows(result)?.into_iter().next())
    }
}
