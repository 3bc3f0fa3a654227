// libs/appointment-cell/src/store/memory.rs
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared_database::StoreError;

use crate::models::{Appointment, AppointmentStatus};
use crate::store::AppointmentStore;

#[derive(Default)]
struct Tables {
    appointments: HashMap<Uuid, Appointment>,
    /// `None` accepts any client id.
    clients: Option<HashSet<i64>>,
}

/// Process-local store used when Supabase is not configured, and in tests.
#[derive(Default)]
pub struct InMemoryAppointmentStore {
    tables: RwLock<Tables>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts reservations to the given client ids.
    pub fn with_clients(clients: impl IntoIterator<Item = i64>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                appointments: HashMap::new(),
                clients: Some(clients.into_iter().collect()),
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.appointments.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn client_exists(&self, client_id: i64) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .clients
            .as_ref()
            .map_or(true, |clients| clients.contains(&client_id)))
    }

    async fn appointments_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        let mut appointments: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| a.date == date)
            .cloned()
            .collect();
        appointments.sort_by_key(|a| (a.time_of_day, a.created_at));
        Ok(appointments)
    }

    async fn insert(&self, appointment: &Appointment) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        let taken = appointment.occupies_slot()
            && tables.appointments.values().any(|existing| {
                existing.occupies_slot()
                    && existing.date == appointment.date
                    && existing.time_of_day == appointment.time_of_day
            });
        if taken {
            return Err(StoreError::Duplicate(format!(
                "{} {} already booked",
                appointment.date, appointment.time_of_day
            )));
        }

        if tables.appointments.contains_key(&appointment.id) {
            return Err(StoreError::Duplicate(format!("appointment {} exists", appointment.id)));
        }

        tables.appointments.insert(appointment.id, appointment.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        Ok(self.tables.read().await.appointments.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .appointments
            .get_mut(&id)
            .filter(|appointment| appointment.status == expected)
            .map(|appointment| {
                appointment.status = status;
                appointment.clone()
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn appointment(date: NaiveDate, time: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            date,
            time_of_day: time.parse().unwrap(),
            status: AppointmentStatus::Pending,
            reason: None,
            is_first_visit: true,
            client_id: 1,
            pet_id: None,
            created_at: Utc::now(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
    }

    #[tokio::test]
    async fn test_second_booking_of_slot_is_duplicate() {
        let store = InMemoryAppointmentStore::new();
        store.insert(&appointment(date(), "08:20")).await.unwrap();

        let err = store.insert(&appointment(date(), "08:20")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        // Same time on another day is fine.
        store.insert(&appointment(date().succ_opt().unwrap(), "08:20")).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_cancelled_booking_frees_slot() {
        let store = InMemoryAppointmentStore::new();
        let first = appointment(date(), "09:00");
        store.insert(&first).await.unwrap();
        store
            .update_status(first.id, AppointmentStatus::Pending, AppointmentStatus::Cancelled)
            .await
            .unwrap();

        store.insert(&appointment(date(), "09:00")).await.unwrap();
        assert_eq!(store.appointments_by_date(date()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_status_requires_expected_status() {
        let store = InMemoryAppointmentStore::new();
        let booked = appointment(date(), "09:00");
        store.insert(&booked).await.unwrap();

        let stale = store
            .update_status(booked.id, AppointmentStatus::Confirmed, AppointmentStatus::Completed)
            .await
            .unwrap();
        assert_eq!(stale, None);
        assert_eq!(store.get(booked.id).await.unwrap().unwrap().status, AppointmentStatus::Pending);

        let cancelled = store
            .update_status(booked.id, AppointmentStatus::Pending, AppointmentStatus::Cancelled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

        // A second writer that also read Pending loses.
        let late = store
            .update_status(booked.id, AppointmentStatus::Pending, AppointmentStatus::Completed)
            .await
            .unwrap();
        assert_eq!(late, None);
        assert_eq!(store.get(booked.id).await.unwrap().unwrap().status, AppointmentStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_client_registry() {
        let open = InMemoryAppointmentStore::new();
        assert!(open.client_exists(42).await.unwrap());

        let restricted = InMemoryAppointmentStore::with_clients([1, 2]);
        assert!(restricted.client_exists(2).await.unwrap());
        assert!(!restricted.client_exists(42).await.unwrap());
    }

    #[tokio::test]
    async fn test_appointments_by_date_sorted_by_time() {
        let store = InMemoryAppointmentStore::new();
        store.insert(&appointment(date(), "10:00")).await.unwrap();
        store.insert(&appointment(date(), "08:00")).await.unwrap();

        let times: Vec<String> = store
            .appointments_by_date(date())
            .await
            .unwrap()
            .iter()
            .map(|a| a.time_of_day.to_string())
            .collect();
        assert_eq!(times, vec!["08:00", "10:00"]);
    }
}
