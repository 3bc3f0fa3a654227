// libs/appointment-cell/src/services/lifecycle.rs
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentError, AppointmentStatus};
use crate::store::AppointmentStore;

/// Status changes driven by the clinic workflow after a booking exists.
pub struct AppointmentLifecycleService {
    store: Arc<dyn AppointmentStore>,
}

impl AppointmentLifecycleService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(current_status: AppointmentStatus) -> &'static [AppointmentStatus] {
        match current_status {
            AppointmentStatus::Pending => &[
                AppointmentStatus::Confirmed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::Completed,
            ],
            AppointmentStatus::Confirmed => &[
                AppointmentStatus::Cancelled,
                AppointmentStatus::Completed,
            ],
            // Terminal states - no transitions allowed
            AppointmentStatus::Completed | AppointmentStatus::Cancelled => &[],
        }
    }

    pub fn validate_status_transition(
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        if !Self::get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }
        Ok(())
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);

        self.store.get(appointment_id).await
            .map_err(|e| {
                error!("Failed to fetch appointment {}: {}", appointment_id, e);
                AppointmentError::DatabaseError(e.to_string())
            })?
            .ok_or(AppointmentError::NotFound)
    }

    pub async fn transition(
        &self,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let current = self.get_appointment(appointment_id).await?;
        Self::validate_status_transition(current.status, new_status)?;

        let updated = self.store
            .update_status(appointment_id, current.status, new_status)
            .await
            .map_err(|e| {
                error!("Failed to update appointment {}: {}", appointment_id, e);
                AppointmentError::DatabaseError(e.to_string())
            })?;

        match updated {
            Some(appointment) => {
                info!("Appointment {} moved {} -> {}", appointment_id, current.status, new_status);
                Ok(appointment)
            }
            None => {
                // Lost a race: report against the status that won.
                let latest = self.get_appointment(appointment_id).await?;
                warn!(
                    "Appointment {} changed to {} while moving {} -> {}",
                    appointment_id, latest.status, current.status, new_status
                );
                Err(AppointmentError::InvalidStatusTransition {
                    from: latest.status,
                    to: new_status,
                })
            }
        }
    }

    pub async fn confirm(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.transition(appointment_id, AppointmentStatus::Confirmed).await
    }

    pub async fn cancel(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.transition(appointment_id, AppointmentStatus::Cancelled).await
    }

    /// Marks the veterinary attention as done.
    pub async fn complete(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.transition(appointment_id, AppointmentStatus::Completed).await
    }
}
