// libs/appointment-cell/src/services/reservation.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use schedule_cell::{ScheduleService, SlotTime};
use shared_database::StoreError;

use crate::models::{Appointment, AppointmentError, AppointmentStatus, ReserveAppointmentRequest};
use crate::services::occupancy;
use crate::store::AppointmentStore;

/// Validates and writes new bookings.
///
/// Writes for the same date are serialised so the occupancy re-check and the
/// insert happen as one step within this process. Across processes the
/// store's uniqueness rule is the guard; both paths surface as `SlotTaken`.
pub struct ReservationWriter {
    schedule: Arc<ScheduleService>,
    store: Arc<dyn AppointmentStore>,
    date_locks: Mutex<HashMap<NaiveDate, Arc<Mutex<()>>>>,
}

impl ReservationWriter {
    pub fn new(schedule: Arc<ScheduleService>, store: Arc<dyn AppointmentStore>) -> Self {
        Self {
            schedule,
            store,
            date_locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn reserve(
        &self,
        request: ReserveAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Reserving {} {} for client {} (first visit: {})",
            request.date, request.time_of_day, request.client_id, request.is_first_visit
        );

        let pet_id = Self::resolve_pet(&request)?;
        self.verify_on_grid(request.date, request.time_of_day).await?;
        self.verify_client_exists(request.client_id).await?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            date: request.date,
            time_of_day: request.time_of_day,
            status: AppointmentStatus::Pending,
            reason: request
                .reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            is_first_visit: request.is_first_visit,
            client_id: request.client_id,
            pet_id,
            created_at: Utc::now(),
        };

        let lock = self.lock_for(appointment.date).await;
        let _guard = lock.lock().await;

        let existing = self.store.appointments_by_date(appointment.date).await
            .map_err(|e| Self::storage_failure("load occupancy", e))?;
        if occupancy::booked_slots(&existing).contains(&appointment.time_of_day) {
            warn!("Slot {} {} already taken", appointment.date, appointment.time_of_day);
            return Err(Self::slot_taken(&appointment));
        }

        match self.store.insert(&appointment).await {
            Ok(()) => {}
            Err(StoreError::Duplicate(detail)) => {
                warn!("Concurrent booking won slot {} {}: {}", appointment.date, appointment.time_of_day, detail);
                return Err(Self::slot_taken(&appointment));
            }
            Err(e) => return Err(Self::storage_failure("insert appointment", e)),
        }

        info!("Appointment {} reserved", appointment.id);
        Ok(appointment)
    }

    /// First visits never carry a pet; every other visit needs one.
    fn resolve_pet(request: &ReserveAppointmentRequest) -> Result<Option<i64>, AppointmentError> {
        if request.is_first_visit {
            if request.pet_id.is_some() {
                debug!("Dropping pet {:?} from first-visit reservation", request.pet_id);
            }
            return Ok(None);
        }

        match request.pet_id {
            Some(pet_id) if pet_id > 0 => Ok(Some(pet_id)),
            _ => Err(AppointmentError::ValidationError("pet required".to_string())),
        }
    }

    /// Only start times the schedule generates for that date can be booked;
    /// an off-grid time would overlap two consults.
    async fn verify_on_grid(&self, date: NaiveDate, time_of_day: SlotTime) -> Result<(), AppointmentError> {
        let mut slots = self.schedule.slots_for(date).await?;
        if slots.any(|slot| slot == time_of_day) {
            return Ok(());
        }

        warn!("{} {} is not a consult slot", date, time_of_day);
        Err(AppointmentError::ValidationError(format!(
            "{} is not a consult slot on {}",
            time_of_day, date
        )))
    }

    async fn verify_client_exists(&self, client_id: i64) -> Result<(), AppointmentError> {
        let exists = self.store.client_exists(client_id).await
            .map_err(|e| Self::storage_failure("look up client", e))?;

        if !exists {
            return Err(AppointmentError::ClientNotFound(client_id));
        }
        Ok(())
    }

    async fn lock_for(&self, date: NaiveDate) -> Arc<Mutex<()>> {
        let mut locks = self.date_locks.lock().await;
        // Drop locks nobody is holding or waiting on.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(locks.entry(date).or_default())
    }

    fn slot_taken(appointment: &Appointment) -> AppointmentError {
        AppointmentError::SlotTaken {
            date: appointment.date,
            time_of_day: appointment.time_of_day,
        }
    }

    fn storage_failure(action: &str, err: StoreError) -> AppointmentError {
        error!("Failed to {}: {}", action, err);
        AppointmentError::DatabaseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryAppointmentStore, MockAppointmentStore};
    use chrono::Weekday;
    use schedule_cell::store::InMemoryScheduleStore;
    use schedule_cell::{DayHours, ScheduleConfiguration};

    /// Mondays 08:00-09:00 in 20 minute consults.
    fn schedule() -> Arc<ScheduleService> {
        let config = ScheduleConfiguration::new(20).with_day(DayHours::active(
            Weekday::Mon,
            "08:00".parse().unwrap(),
            "09:00".parse().unwrap(),
        ));
        Arc::new(ScheduleService::new(Arc::new(InMemoryScheduleStore::with_configuration(config))))
    }

    fn writer_for(store: Arc<dyn AppointmentStore>) -> ReservationWriter {
        ReservationWriter::new(schedule(), store)
    }

    fn request(pet_id: Option<i64>, is_first_visit: bool) -> ReserveAppointmentRequest {
        ReserveAppointmentRequest {
            date: NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
            time_of_day: "08:20".parse().unwrap(),
            client_id: 1,
            pet_id,
            is_first_visit,
            reason: Some("  vaccination ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_first_visit_drops_pet() {
        let writer = writer_for(Arc::new(InMemoryAppointmentStore::new()));

        let appointment = writer.reserve(request(Some(5), true)).await.unwrap();

        assert_eq!(appointment.pet_id, None);
        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert_eq!(appointment.reason.as_deref(), Some("vaccination"));
    }

    #[tokio::test]
    async fn test_missing_or_zero_pet_is_rejected() {
        let store = Arc::new(InMemoryAppointmentStore::new());
        let writer = writer_for(store.clone());

        for pet_id in [None, Some(0)] {
            let err = writer.reserve(request(pet_id, false)).await.unwrap_err();
            assert_eq!(err, AppointmentError::ValidationError("pet required".to_string()));
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_client_is_rejected() {
        let writer = writer_for(Arc::new(InMemoryAppointmentStore::with_clients([2])));

        let err = writer.reserve(request(Some(5), false)).await.unwrap_err();
        assert_eq!(err, AppointmentError::ClientNotFound(1));
    }

    #[tokio::test]
    async fn test_store_duplicate_maps_to_slot_taken() {
        let mut store = MockAppointmentStore::new();
        store.expect_client_exists().returning(|_| Ok(true));
        store.expect_appointments_by_date().returning(|_| Ok(vec![]));
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(StoreError::Duplicate("appointments_slot_key".to_string())));

        let writer = writer_for(Arc::new(store));
        let err = writer.reserve(request(Some(5), false)).await.unwrap_err();

        assert!(matches!(err, AppointmentError::SlotTaken { .. }));
    }

    #[tokio::test]
    async fn test_insert_failure_is_database_error_without_retry() {
        let mut store = MockAppointmentStore::new();
        store.expect_client_exists().returning(|_| Ok(true));
        store.expect_appointments_by_date().returning(|_| Ok(vec![]));
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(StoreError::Backend(anyhow::anyhow!("timeout"))));

        let writer = writer_for(Arc::new(store));
        let err = writer.reserve(request(Some(5), false)).await.unwrap_err();

        assert!(matches!(err, AppointmentError::DatabaseError(msg) if msg.contains("timeout")));
    }

    #[tokio::test]
    async fn test_validation_happens_before_any_storage_call() {
        let mut store = MockAppointmentStore::new();
        store.expect_client_exists().never();
        store.expect_insert().never();

        let writer = writer_for(Arc::new(store));
        assert!(writer.reserve(request(None, false)).await.is_err());
    }

    #[tokio::test]
    async fn test_off_grid_time_is_rejected() {
        let mut store = MockAppointmentStore::new();
        store.expect_client_exists().never();
        store.expect_insert().never();
        let writer = writer_for(Arc::new(store));

        let mut off_grid = request(Some(5), false);
        off_grid.time_of_day = "08:10".parse().unwrap();
        let err = writer.reserve(off_grid).await.unwrap_err();
        assert_eq!(
            err,
            AppointmentError::ValidationError("08:10 is not a consult slot on 2025-06-16".to_string())
        );

        let mut after_closing = request(Some(5), false);
        after_closing.time_of_day = "09:00".parse().unwrap();
        assert!(matches!(
            writer.reserve(after_closing).await,
            Err(AppointmentError::ValidationError(_))
        ));

        let mut closed_day = request(Some(5), false);
        closed_day.date = closed_day.date.succ_opt().unwrap();
        assert!(matches!(
            writer.reserve(closed_day).await,
            Err(AppointmentError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_schedule_accepts_nothing() {
        let schedule = Arc::new(ScheduleService::new(Arc::new(InMemoryScheduleStore::new())));
        let store = Arc::new(InMemoryAppointmentStore::new());
        let writer = ReservationWriter::new(schedule, store.clone());

        let err = writer.reserve(request(Some(5), false)).await.unwrap_err();
        assert!(matches!(err, AppointmentError::ValidationError(_)));
        assert!(store.is_empty().await);
    }
}
