// libs/schedule-cell/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{ScheduleConfiguration, ScheduleConfigurationRecord, ScheduleError};
use crate::services::schedule::ScheduleService;

pub fn map_schedule_error(err: ScheduleError) -> AppError {
    match err {
        ScheduleError::Configuration(msg) => AppError::Configuration(msg),
        ScheduleError::InvalidTime(msg) => AppError::BadRequest(format!("Invalid time of day: {}", msg)),
        ScheduleError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(service): State<Arc<ScheduleService>>,
) -> Result<Json<Value>, AppError> {
    let config = service.get_configuration().await
        .map_err(map_schedule_error)?
        .ok_or_else(|| AppError::NotFound("Schedule has not been configured".to_string()))?;

    Ok(Json(json!(config)))
}

#[axum::debug_handler]
pub async fn save_schedule(
    State(service): State<Arc<ScheduleService>>,
    Json(record): Json<ScheduleConfigurationRecord>,
) -> Result<Json<Value>, AppError> {
    let config = ScheduleConfiguration::try_from(record).map_err(map_schedule_error)?;

    let saved = service.save_configuration(config).await
        .map_err(map_schedule_error)?;

    Ok(Json(json!({
        "success": true,
        "schedule": saved,
        "message": "Schedule configuration saved"
    })))
}
