// libs/schedule-cell/src/store/supabase.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_database::{StoreError, SupabaseClient};

use crate::models::{ScheduleConfiguration, ScheduleConfigurationRecord};
use crate::store::ScheduleStore;

/// Row id of the singleton configuration.
const SCHEDULE_ROW_ID: i64 = 1;

pub struct SupabaseScheduleStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseScheduleStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl ScheduleStore for SupabaseScheduleStore {
    async fn load(&self) -> Result<Option<ScheduleConfiguration>, StoreError> {
        let path = format!(
            "/rest/v1/schedule_configurations?id=eq.{}&limit=1",
            SCHEDULE_ROW_ID
        );

        let result: Vec<Value> = self.supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(StoreError::from_backend)?;

        let Some(row) = result.into_iter().next() else {
            debug!("No schedule configuration stored yet");
            return Ok(None);
        };

        let config: ScheduleConfiguration = serde_json::from_value(row)?;
        Ok(Some(config))
    }

    async fn save(&self, config: &ScheduleConfiguration) -> Result<(), StoreError> {
        let record = ScheduleConfigurationRecord::from(config.clone());
        let body = json!({
            "id": SCHEDULE_ROW_ID,
            "consult_duration_minutes": record.consult_duration_minutes,
            "days": record.days,
            "updated_at": Utc::now().to_rfc3339(),
        });

        let _: Vec<Value> = self.supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/schedule_configurations",
                Some(body),
                Some(SupabaseClient::upsert_representation()),
            )
            .await
            .map_err(StoreError::from_backend)?;

        Ok(())
    }
}
