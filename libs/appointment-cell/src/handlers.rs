// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    AppointmentError, AppointmentsByDateQuery, AvailableSlotsQuery, ReserveAppointmentRequest,
};
use crate::state::AppointmentState;

pub fn map_appointment_error(err: AppointmentError) -> AppError {
    match err {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::ClientNotFound(id) => AppError::NotFound(format!("Client {} not found", id)),
        AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
        AppointmentError::SlotTaken { date, time_of_day } => AppError::Conflict(format!(
            "Slot {} on {} is no longer available",
            time_of_day, date
        )),
        AppointmentError::InvalidStatusTransition { from, to } => AppError::Conflict(format!(
            "Appointment cannot move from {} to {}",
            from, to
        )),
        // A bad stored schedule is a server-side fault, not the caller's.
        AppointmentError::ConfigurationError(msg) => AppError::Internal(format!("Schedule misconfigured: {}", msg)),
        AppointmentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// AVAILABILITY
// ==============================================================================

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppointmentState>>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let slots = state.availability
        .available_slots_for_raw(query.date.as_deref())
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(slots.iter().map(ToString::to_string).collect()))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppointmentState>>,
    Query(query): Query<AppointmentsByDateQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = state.availability
        .appointments_on(query.date)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "date": query.date,
        "appointments": appointments,
        "total": appointments.len()
    })))
}

// ==============================================================================
// RESERVATION
// ==============================================================================

#[axum::debug_handler]
pub async fn reserve_appointment(
    State(state): State<Arc<AppointmentState>>,
    Json(request): Json<ReserveAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state.reservations
        .reserve(request)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment_id": appointment.id,
        "appointment": appointment,
        "message": "Appointment reserved successfully"
    })))
}

// ==============================================================================
// LIFECYCLE
// ==============================================================================

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = state.lifecycle
        .get_appointment(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn confirm_appointment(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = state.lifecycle
        .confirm(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment confirmed"
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = state.lifecycle
        .cancel(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment cancelled, slot released"
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = state.lifecycle
        .complete(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Veterinary attention recorded"
    })))
}
