// libs/appointment-cell/src/services/availability.rs
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, warn};

use schedule_cell::{ScheduleService, SlotTime};
use shared_utils::Clock;

use crate::models::{Appointment, AppointmentError};
use crate::services::{occupancy, past_time};
use crate::store::AppointmentStore;

pub struct AvailabilityService {
    schedule: Arc<ScheduleService>,
    store: Arc<dyn AppointmentStore>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    pub fn new(
        schedule: Arc<ScheduleService>,
        store: Arc<dyn AppointmentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { schedule, store, clock }
    }

    /// Bookable times for `date`: schedule slots minus booked ones minus
    /// those already elapsed.
    pub async fn available_slots(&self, date: NaiveDate) -> Result<Vec<SlotTime>, AppointmentError> {
        debug!("Calculating available slots for {}", date);

        let candidates: Vec<SlotTime> = self.schedule.slots_for(date).await?.collect();
        if candidates.is_empty() {
            return Ok(candidates);
        }

        let now = self.clock.now();
        // past_time::filter would empty the list anyway; skip the storage read.
        if past_time::is_past(date, now) {
            debug!("{} is in the past, no slots offered", date);
            return Ok(Vec::new());
        }

        let appointments = self.appointments_on(date).await?;
        let booked = occupancy::booked_slots(&appointments);
        let free = occupancy::filter(candidates, &booked);
        let available = past_time::filter(free, date, now);

        debug!("Found {} available slots on {}", available.len(), date);
        Ok(available)
    }

    /// Lenient entry point for raw `YYYY-MM-DD` input: a missing or malformed
    /// date gives an empty list.
    pub async fn available_slots_for_raw(
        &self,
        raw_date: Option<&str>,
    ) -> Result<Vec<SlotTime>, AppointmentError> {
        let Some(raw) = raw_date else {
            return Ok(Vec::new());
        };

        match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(date) => self.available_slots(date).await,
            Err(_) => {
                warn!("Ignoring slot query with malformed date '{}'", raw);
                Ok(Vec::new())
            }
        }
    }

    pub async fn appointments_on(&self, date: NaiveDate) -> Result<Vec<Appointment>, AppointmentError> {
        self.store.appointments_by_date(date).await.map_err(|e| {
            error!("Failed to load appointments for {}: {}", date, e);
            AppointmentError::DatabaseError(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockAppointmentStore;
    use chrono::Weekday;
    use schedule_cell::store::InMemoryScheduleStore;
    use schedule_cell::{DayHours, ScheduleConfiguration};
    use shared_database::StoreError;
    use shared_utils::test_utils::fixed_clock;

    fn schedule() -> Arc<ScheduleService> {
        let config = ScheduleConfiguration::new(30).with_day(DayHours::active(
            Weekday::Mon,
            "09:00".parse().unwrap(),
            "10:00".parse().unwrap(),
        ));
        Arc::new(ScheduleService::new(Arc::new(InMemoryScheduleStore::with_configuration(config))))
    }

    #[tokio::test]
    async fn test_storage_failure_is_propagated() {
        let mut store = MockAppointmentStore::new();
        store
            .expect_appointments_by_date()
            .returning(|_| Err(StoreError::Backend(anyhow::anyhow!("connection refused"))));

        let service = AvailabilityService::new(
            schedule(),
            Arc::new(store),
            Arc::new(fixed_clock("2025-06-01", "08:00")),
        );

        let err = service
            .available_slots(NaiveDate::from_ymd_opt(2025, 6, 16).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppointmentError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_closed_day_skips_storage() {
        let mut store = MockAppointmentStore::new();
        store.expect_appointments_by_date().never();

        let service = AvailabilityService::new(
            schedule(),
            Arc::new(store),
            Arc::new(fixed_clock("2025-06-01", "08:00")),
        );

        // 2025-06-17 is a Tuesday.
        let slots = service
            .available_slots(NaiveDate::from_ymd_opt(2025, 6, 17).unwrap())
            .await
            .unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_past_date_skips_storage() {
        let mut store = MockAppointmentStore::new();
        store.expect_appointments_by_date().never();

        let service = AvailabilityService::new(
            schedule(),
            Arc::new(store),
            Arc::new(fixed_clock("2025-06-20", "08:00")),
        );

        let slots = service
            .available_slots(NaiveDate::from_ymd_opt(2025, 6, 16).unwrap())
            .await
            .unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_date_is_empty_not_error() {
        let mut store = MockAppointmentStore::new();
        store.expect_appointments_by_date().never();

        let service = AvailabilityService::new(
            schedule(),
            Arc::new(store),
            Arc::new(fixed_clock("2025-06-01", "08:00")),
        );

        assert!(service.available_slots_for_raw(Some("16/06/2025")).await.unwrap().is_empty());
        assert!(service.available_slots_for_raw(Some("2025-02-30")).await.unwrap().is_empty());
        assert!(service.available_slots_for_raw(None).await.unwrap().is_empty());
    }
}
