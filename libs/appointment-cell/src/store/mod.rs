// libs/appointment-cell/src/store/mod.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use shared_database::StoreError;

use crate::models::{Appointment, AppointmentStatus};

pub mod memory;
pub mod supabase;

pub use memory::InMemoryAppointmentStore;
pub use supabase::SupabaseAppointmentStore;

/// Appointment persistence.
///
/// Implementations must refuse a second non-cancelled appointment on the
/// same (date, time_of_day) and report it as `StoreError::Duplicate`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn client_exists(&self, client_id: i64) -> Result<bool, StoreError>;

    /// Every appointment on `date`, cancelled ones included, ordered by time.
    async fn appointments_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, StoreError>;

    async fn insert(&self, appointment: &Appointment) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, StoreError>;

    /// Compare-and-set: writes `status` only while the row is still in
    /// `expected`. `None` when no row matched, either because it does not
    /// exist or because its status moved on.
    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, StoreError>;
}
